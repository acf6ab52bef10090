//! Handlers that read or change the cart.

use async_trait::async_trait;
use tracing::info;

use super::{HandlerInput, RequestHandler};
use crate::attributes::{clear_attributes, load_attributes, save_attributes};
use crate::cart::{format_amount, CartTotals, Product, IVA_RATE};
use crate::envelope::RequestKind;
use crate::response::{get_response, ResponseEnvelope};
use crate::Result;

pub const ADD_PRODUCT_INTENT: &str = "AddProductIntent";
pub const CLOSE_CART_INTENT: &str = "CloseCartIntent";

pub const WELCOME_NEW_CART: &str = "Bienvenido, empieza a agregar productos";
pub const WELCOME_ACTIVE_CART: &str =
    "Bienvenido. Tienes un carrito en curso, sigue agregando productos";
pub const PRODUCT_NOT_ADDED: &str = "Entendido, no se agregó ningún producto";
pub const PRODUCT_ADDED: &str = "Producto agregado";

pub struct LaunchRequestHandler;

#[async_trait]
impl RequestHandler for LaunchRequestHandler {
    fn name(&self) -> &'static str {
        "LaunchRequest"
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        input.envelope.kind() == RequestKind::Launch
    }

    async fn handle(&self, input: &mut HandlerInput) -> Result<ResponseEnvelope> {
        let attributes = load_attributes(&mut input.attributes_manager).await?;
        let speech = if attributes.has_active_cart() {
            WELCOME_ACTIVE_CART
        } else {
            WELCOME_NEW_CART
        };
        Ok(get_response(speech, true))
    }
}

pub struct AddProductIntentHandler;

#[async_trait]
impl RequestHandler for AddProductIntentHandler {
    fn name(&self) -> &'static str {
        ADD_PRODUCT_INTENT
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        input.envelope.is_intent(&[ADD_PRODUCT_INTENT])
    }

    async fn handle(&self, input: &mut HandlerInput) -> Result<ResponseEnvelope> {
        if input.envelope.is_denied() {
            return Ok(get_response(PRODUCT_NOT_ADDED, true));
        }

        let mut attributes = load_attributes(&mut input.attributes_manager).await?;

        let envelope = &input.envelope;
        let product = Product::from_slots(
            envelope.get_slot("name"),
            envelope.get_slot("price"),
            envelope.get_slot("amount"),
        );
        info!(
            name = ?product.name,
            price = ?product.price,
            amount = ?product.amount,
            "Adding product to cart"
        );

        attributes.products.push(product);
        save_attributes(&mut input.attributes_manager, attributes).await?;

        Ok(get_response(PRODUCT_ADDED, true))
    }
}

pub struct CloseCartIntentHandler;

#[async_trait]
impl RequestHandler for CloseCartIntentHandler {
    fn name(&self) -> &'static str {
        CLOSE_CART_INTENT
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        input.envelope.is_intent(&[CLOSE_CART_INTENT])
    }

    async fn handle(&self, input: &mut HandlerInput) -> Result<ResponseEnvelope> {
        let attributes = load_attributes(&mut input.attributes_manager).await?;
        let totals = CartTotals::from_products(&attributes.products);

        clear_attributes(&mut input.attributes_manager).await?;
        info!(
            products = attributes.products.len(),
            subtotal = totals.subtotal,
            total = totals.total,
            "Cart closed"
        );

        Ok(get_response(checkout_speech(&totals), false))
    }
}

fn checkout_speech(totals: &CartTotals) -> String {
    format!(
        "El total a pagar es de {} pesos, de un subtotal de {} pesos más {} por ciento de IVA",
        format_amount(totals.total),
        format_amount(totals.subtotal),
        format_amount(IVA_RATE * 100.0),
    )
}
