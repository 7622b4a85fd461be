//! Stripe Checkout adapter implementing the `PaymentGateway` port.

mod dto;
mod http_gateway;

pub use http_gateway::{DEFAULT_STRIPE_API_BASE, StripeCheckoutGateway, StripeGatewayConfig};
