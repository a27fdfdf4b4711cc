//! Resource services: independent CRUD backends over disjoint datasets.
//!
//! They are peers — none ever calls another. Identifiers borrowed from a
//! different service's domain (a sale's customerId, an invoice's saleId)
//! are stored opaquely with no existence check; consistency across
//! services is caller discipline, not a data-layer guarantee.

pub mod customer;
pub mod invoice;
pub mod product;
pub mod sales;
