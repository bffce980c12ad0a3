use anyhow::Context;
use contracts::domain::a006_invoice::aggregate::{Invoice, InvoiceKind};
use serde::Serialize;

use crate::shared::data::store::MockStore;
use crate::shared::error::ErpResult;

/// Строка выгрузки счетов в CSV
#[derive(Debug, Serialize)]
struct InvoiceCsvRow<'a> {
    number: &'a str,
    kind: &'static str,
    status: &'static str,
    issue_date: String,
    due_date: String,
    party_code: String,
    party_name: String,
    employee: String,
    taxable_base: String,
    vat_total: String,
    total: String,
}

fn party(store: &MockStore, invoice: &Invoice) -> (String, String) {
    let found = match invoice.kind {
        InvoiceKind::Sale => invoice
            .client_id
            .as_deref()
            .and_then(|id| store.clients.get_by_ref(id))
            .map(|c| (c.base.code.clone(), c.base.description.clone())),
        InvoiceKind::Purchase => invoice
            .supplier_id
            .as_deref()
            .and_then(|id| store.suppliers.get_by_ref(id))
            .map(|s| (s.base.code.clone(), s.base.description.clone())),
    };
    found.unwrap_or_default()
}

/// Выгрузка списка счетов. Разделитель `;`, суммы с двумя знаками.
pub fn to_csv(store: &MockStore, invoices: &[Invoice]) -> ErpResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());

    for invoice in invoices {
        let (party_code, party_name) = party(store, invoice);
        let employee = store
            .employees
            .get_by_ref(&invoice.employee_id)
            .map(|e| e.base.description.clone())
            .unwrap_or_default();
        writer
            .serialize(InvoiceCsvRow {
                number: invoice.number(),
                kind: match invoice.kind {
                    InvoiceKind::Sale => "sale",
                    InvoiceKind::Purchase => "purchase",
                },
                status: invoice.status.code(),
                issue_date: invoice.issue_date.to_string(),
                due_date: invoice.due_date.map(|d| d.to_string()).unwrap_or_default(),
                party_code,
                party_name,
                employee,
                taxable_base: format!("{:.2}", invoice.totals.taxable_base),
                vat_total: format!("{:.2}", invoice.totals.vat_total),
                total: format!("{:.2}", invoice.totals.total),
            })
            .context("Failed to write CSV row")?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV: {}", e))?;
    let text = String::from_utf8(bytes).context("CSV is not valid UTF-8")?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::domain::a001_client::aggregate::{Client, ClientDto};
    use contracts::domain::a006_invoice::calc::InvoiceLine;

    #[test]
    fn test_csv_has_header_and_rows() {
        let mut store = MockStore::default();
        let client = Client::new_for_insert(
            "CLI-0001".into(),
            &ClientDto {
                name: "Frutas Levante".into(),
                ..Default::default()
            },
        );
        let mut invoice = Invoice::new_for_insert(
            "FV-2026-0001".into(),
            InvoiceKind::Sale,
            NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        );
        invoice.client_id = Some(client.to_string_id());
        invoice.set_lines(vec![InvoiceLine::compute(
            "p".into(),
            "Tornillo".into(),
            10,
            2.0,
            21.0,
            0.0,
        )]);
        store.clients.insert(client);

        let csv = to_csv(&store, &[invoice]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("number;kind;status;issue_date;due_date;party_code;party_name;employee;taxable_base;vat_total;total")
        );
        assert_eq!(
            lines.next(),
            Some("FV-2026-0001;sale;draft;2026-03-14;;CLI-0001;Frutas Levante;;20.00;4.20;24.20")
        );
        assert_eq!(lines.next(), None);
    }
}
