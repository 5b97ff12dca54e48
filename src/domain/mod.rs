//! Domain layer: the catalog, the pricing engine and the proposal record,
//! plus the storage ports the other layers implement.

pub mod catalog;
pub mod money;
pub mod ports;
pub mod pricing;
pub mod proposal;
pub mod selection;
