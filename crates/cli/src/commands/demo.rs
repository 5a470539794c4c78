//! Scripted walkthrough against the in-memory gateway.
//!
//! # Usage
//!
//! ```bash
//! cartwheel demo
//! cartwheel demo --json --theme dark
//! RUST_LOG=debug cartwheel demo
//! ```

use std::io::Cursor;
use std::sync::Arc;

use image::{ImageFormat, Rgb, RgbImage};
use tracing::info;

use cartwheel_core::{ProductId, Theme};
use cartwheel_engine::context::SortContext;
use cartwheel_engine::notify::NotificationHub;
use cartwheel_engine::session::SessionPreferences;
use cartwheel_engine::store::MemoryGateway;
use cartwheel_engine::strategy::{
    NewProduct, SortAlphabetically, SortByPriceHighToLow, SortByPriceLowToHigh,
};
use cartwheel_engine::{EngineConfig, Shop};

use super::{CommandError, print_summary};

const CATALOG: [(&str, &str, f64); 3] = [
    ("widget", "Widget", 9.99),
    ("gadget", "gadget", 24.50),
    ("gizmo", "Gizmo", 4.25),
];

/// Seed a catalog, fill the cart, announce a discount and place the order.
///
/// # Errors
///
/// Returns an error if any engine operation fails.
pub async fn run(config: EngineConfig, theme: Theme, json: bool) -> Result<(), CommandError> {
    let session = Arc::new(
        SessionPreferences::new().with_theme_hook(|theme| info!(%theme, "Applied theme")),
    );
    let shop = Shop::new(
        Arc::new(MemoryGateway::new()),
        NotificationHub::new(),
        Arc::clone(&session),
        config,
    );

    let _catalog = shop.hub().catalog().subscribe_scoped(|snapshot| {
        info!(products = snapshot.products.len(), "Catalog updated");
    });
    let _discounts = shop.hub().discounts().subscribe_scoped(|event| {
        info!(
            product_id = %event.product_id,
            price = event.discounted_price,
            "Discount announced"
        );
    });

    session.set_theme(theme);

    for (id, name, price) in CATALOG {
        let mut product = NewProduct::new(name, price).with_id(ProductId::new(id));
        if id == "widget" {
            product = product.with_image(sample_png()?);
        }
        shop.add_product(product).await?;
    }

    let mut sort = SortContext::new(SortAlphabetically);
    print_catalog("Alphabetical", &shop.products(&sort).await?);
    sort.set_strategy(SortByPriceLowToHigh);
    print_catalog("Price, low to high", &shop.products(&sort).await?);
    sort.set_strategy(SortByPriceHighToLow);
    print_catalog("Price, high to low", &shop.products(&sort).await?);

    let widget = ProductId::new("widget");
    let gadget = ProductId::new("gadget");
    shop.add_to_cart(&widget, "Standard", "CreditCard").await?;
    shop.add_to_cart(&widget, "Standard", "CreditCard").await?;
    shop.add_to_cart(&gadget, "Express", "PayPal").await?;

    session.set_admin(true);
    shop.announce_discount(&gadget, 10.0).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("Cart:");
        for item in shop.cart().await? {
            println!(
                "  {} x{} (${:.2}) via {} / {}",
                item.name, item.quantity, item.price, item.shipping, item.payment
            );
        }
    }

    let summary = shop.place_order().await?;
    print_summary(&summary, json)
}

/// A small gradient PNG standing in for a picked product photo.
#[allow(clippy::cast_possible_truncation)]
fn sample_png() -> Result<Vec<u8>, image::ImageError> {
    let img = RgbImage::from_fn(32, 32, |x, y| Rgb([(x * 8) as u8, (y * 8) as u8, 128]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

fn print_catalog(title: &str, products: &[cartwheel_core::Product]) {
    #[allow(clippy::print_stdout)]
    {
        println!("{title}:");
        for product in products {
            println!("  {:<8} ${:>6.2}", product.name, product.price);
        }
    }
}
