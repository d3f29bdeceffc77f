use rust_decimal::Decimal;
use tracing::{debug, error, info, Instrument};

use order_editor::app_system::{setup_tracing, OrderSystem, SystemConfig};
use order_editor::domain::{Customer, CustomerRef, Product, ProductUnit};
use order_editor::editor::{
    BackChoice, BackOutcome, NewLine, OpenRequest, OrderEditor, ViewLiveness,
};

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = SystemConfig::from_env();
    setup_tracing(&config);

    info!("Starting order editor demo");
    let system = OrderSystem::with_config(&config);

    // Seed the customer directory and catalog
    let customer = system
        .customer_client
        .create_customer(Customer::new("Alice", "555-0100"))
        .await
        .map_err(|e| e.to_string())?;
    let pens = system
        .product_client
        .create_product(Product::new(
            "temp_id",
            "Ballpoint pen",
            Decimal::new(150, 2),
            vec![
                ProductUnit::new("pcs", "Piece", Decimal::ONE),
                ProductUnit::new("box", "Box of 12", Decimal::from(12)),
            ],
        ))
        .await
        .map_err(|e| e.to_string())?;

    // First session: build an order and leave through the unsaved-changes dialog
    let draft_id = async {
        let mut editor = OrderEditor::open(
            system.editor_clients(),
            config.editor_settings(),
            OpenRequest::new_order().with_customer(CustomerRef::new(&customer.id, &customer.name)),
            ViewLiveness::new(),
        )
        .await;

        editor
            .add_line_item(NewLine {
                product_id: pens.id.clone(),
                unit_id: Some("box".to_string()),
                quantity: Decimal::from(2),
                update_rate: None,
                narration: "Blue ink".to_string(),
            })
            .await
            .map_err(|e| e.to_string())?;
        editor.set_note_text("Deliver before noon");
        editor.set_freight_text("3.50");
        info!(total = ?editor.total(), "Order built");

        if editor.request_back() == BackOutcome::AwaitingChoice {
            editor
                .resolve_back_dialog(BackChoice::from_result(Some("save")))
                .await
                .map_err(|e| e.to_string())?;
        }
        let snapshot = editor.snapshot();
        if !snapshot.is_closed() {
            return Err("editor is still open".to_string());
        }
        snapshot
            .order
            .as_ref()
            .map(|order| order.id.clone())
            .ok_or_else(|| "draft was not saved".to_string())
    }
    .instrument(tracing::info_span!("first_session"))
    .await?;

    // Second session: reopen the draft and send it
    let send_result = async {
        let mut editor = OrderEditor::open(
            system.editor_clients(),
            config.editor_settings(),
            OpenRequest::draft(&draft_id),
            ViewLiveness::new(),
        )
        .await;
        info!(total = ?editor.total(), "Draft reopened");
        editor.send_order().await
    }
    .instrument(tracing::info_span!("second_session"))
    .await;

    match send_result {
        Ok(order) => {
            info!(order_id = %order.id, total = %order.total, "Order sent to storekeepers");
            match serde_json::to_string(&order) {
                Ok(json) => debug!(%json, "Submitted order"),
                Err(e) => error!(error = %e, "Could not serialize submitted order"),
            }
        }
        Err(e) => error!(error = %e, "Sending failed"),
    }

    system.shutdown().await?;

    info!("Demo completed successfully");
    Ok(())
}
