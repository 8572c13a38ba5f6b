use super::ui;
use crate::core::conversion::round_to;
use crate::core::currency::{BASE_CURRENCY, Currency, RateSource, RateTable};
use anyhow::Result;
use comfy_table::{Cell, CellAlignment, Table};

pub async fn run(source: &dyn RateSource) -> Result<()> {
    let pb = ui::new_spinner("Fetching exchange rates...");
    let result = source.fetch_rates().await;
    pb.finish_and_clear();

    let rates = result?;
    println!(
        "{}",
        ui::style_text(
            &format!(
                "Exchange rates for {} (per 1 {BASE_CURRENCY})",
                chrono::Local::now().format("%d.%m.%Y")
            ),
            ui::StyleType::Title
        )
    );
    println!("{}", rates_table(&rates));
    Ok(())
}

fn rates_table(rates: &RateTable) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Currency"), ui::header_cell("Rate")]);

    for currency in Currency::ALL {
        let rate = round_to(rates.rate_for(currency), currency.rate_scale());
        table.add_row(vec![
            Cell::new(currency.code()),
            Cell::new(rate.to_string()).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
