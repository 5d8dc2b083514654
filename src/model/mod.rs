//! Records yang di-cache ke slot store.
//!
//! Urutan field di setiap struct adalah layout persisted. Jangan diubah,
//! jangan disisipi field baru, kecuali cache lama memang boleh hilang.

mod auth;
mod price;

pub use auth::{AuthData, AuthPersonalData, SERVICE_RESPONSE_SUCCESS};
pub use price::{CurrentPriceData, Price, PriceData, PriceLevel};
