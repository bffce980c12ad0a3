//! Демо-данные для консоли.
//!
//! Всё создаётся через сервисы, поэтому коды, журнал и остатки
//! получаются такими же, как при работе через API.

use chrono::{NaiveDate, Utc};
use contracts::domain::a001_client::aggregate::ClientDto;
use contracts::domain::a002_supplier::aggregate::SupplierDto;
use contracts::domain::a003_employee::aggregate::EmployeeDto;
use contracts::domain::a004_product::aggregate::ProductDto;
use contracts::domain::a005_warehouse::aggregate::WarehouseDto;
use contracts::domain::a006_invoice::aggregate::{
    InvoiceDto, InvoiceKind, InvoiceLineDto, InvoiceStatus, PaymentMethod,
};
use contracts::enums::Role;

use crate::domain::{
    a001_client, a002_supplier, a003_employee, a004_product, a005_warehouse, a006_invoice,
};
use crate::shared::activity_log::Actor;
use crate::shared::data::store::MockStore;
use crate::shared::error::ErpResult;

/// Пароль демо-сотрудников (кроме администратора)
pub const DEMO_PASSWORD: &str = "demo123";

fn days_ago(days: i64) -> NaiveDate {
    Utc::now().date_naive() - chrono::Duration::days(days)
}

fn employee(name: &str, email: &str, position: &str, role: Role) -> EmployeeDto {
    EmployeeDto {
        id: None,
        code: None,
        name: name.into(),
        email: email.into(),
        phone: None,
        position: Some(position.into()),
        role,
        is_blocked: false,
        hired_on: Some(days_ago(400)),
        comment: None,
        password: Some(DEMO_PASSWORD.into()),
    }
}

fn line(product_id: &str, quantity: i64, discount_pct: Option<f64>) -> InvoiceLineDto {
    InvoiceLineDto {
        product_id: product_id.to_string(),
        quantity,
        discount_pct,
        ..Default::default()
    }
}

pub fn seed_demo_data(store: &mut MockStore) -> ErpResult<()> {
    let system = Actor::system();

    // Сотрудники
    a003_employee::service::create(
        store,
        &system,
        employee("Laura Gómez", "laura@erp.local", "Directora comercial", Role::Manager),
    )?;
    let sales = a003_employee::service::create(
        store,
        &system,
        employee("Marta Vidal", "marta@erp.local", "Comercial", Role::Sales),
    )?;
    let storekeeper = a003_employee::service::create(
        store,
        &system,
        employee("Jon Etxeberria", "jon@erp.local", "Jefe de almacén", Role::Warehouse),
    )?;

    // Склады
    let central = a005_warehouse::service::create(
        store,
        &system,
        WarehouseDto {
            name: "Almacén Central".into(),
            address: Some("Calle de la Industria 12".into()),
            city: Some("Madrid".into()),
            manager_id: Some(storekeeper.to_string_id()),
            capacity: Some(20_000),
            ..Default::default()
        },
    )?;
    a005_warehouse::service::create(
        store,
        &system,
        WarehouseDto {
            name: "Almacén Norte".into(),
            city: Some("Bilbao".into()),
            capacity: Some(8_000),
            ..Default::default()
        },
    )?;

    // Поставщики
    let steel = a002_supplier::service::create(
        store,
        &system,
        SupplierDto {
            name: "Aceros del Norte SL".into(),
            tax_id: Some("B48123456".into()),
            contact_name: Some("Iñaki Arrieta".into()),
            email: Some("pedidos@acerosdelnorte.es".into()),
            city: Some("Bilbao".into()),
            country: Some("España".into()),
            payment_terms_days: Some(60),
            ..Default::default()
        },
    )?;
    let safety = a002_supplier::service::create(
        store,
        &system,
        SupplierDto {
            name: "Seguridad Laboral Levante SA".into(),
            tax_id: Some("A46987654".into()),
            email: Some("ventas@sllevante.es".into()),
            city: Some("Valencia".into()),
            country: Some("España".into()),
            ..Default::default()
        },
    )?;

    // Клиенты
    let ruiz = a001_client::service::create(
        store,
        &system,
        ClientDto {
            name: "Construcciones Ruiz SL".into(),
            tax_id: Some("B28111222".into()),
            email: Some("compras@construccionesruiz.es".into()),
            city: Some("Madrid".into()),
            postal_code: Some("28045".into()),
            country: Some("España".into()),
            ..Default::default()
        },
    )?;
    let garcia = a001_client::service::create(
        store,
        &system,
        ClientDto {
            name: "Talleres Mecánicos García".into(),
            tax_id: Some("B41333444".into()),
            city: Some("Sevilla".into()),
            country: Some("España".into()),
            ..Default::default()
        },
    )?;
    let costa = a001_client::service::create(
        store,
        &system,
        ClientDto {
            name: "Reformas Costa Azul".into(),
            email: Some("info@costaazul.es".into()),
            city: Some("Alicante".into()),
            country: Some("España".into()),
            ..Default::default()
        },
    )?;

    // Товары
    let product = |code: &str, name: &str, category: &str, price: f64, stock: i64, min: i64, supplier: &str| {
        ProductDto {
            code: Some(code.into()),
            name: name.into(),
            category: Some(category.into()),
            price,
            vat_rate: 21.0,
            stock,
            min_stock: min,
            supplier_id: Some(supplier.to_string()),
            warehouse_id: Some(central.to_string_id()),
            ..Default::default()
        }
    };
    let steel_id = steel.to_string_id();
    let safety_id = safety.to_string_id();
    let bolt = a004_product::service::create(
        store,
        &system,
        product("TOR-M8", "Tornillo hexagonal M8", "Fijaciones", 0.35, 300, 50, &steel_id),
    )?;
    let nut = a004_product::service::create(
        store,
        &system,
        product("TUE-M8", "Tuerca M8", "Fijaciones", 0.12, 800, 100, &steel_id),
    )?;
    let drill = a004_product::service::create(
        store,
        &system,
        product("TAL-18V", "Taladro percutor 18V", "Herramientas", 89.90, 12, 3, &steel_id),
    )?;
    let gloves = a004_product::service::create(
        store,
        &system,
        product("GUA-NIT", "Guantes de nitrilo (caja)", "Seguridad", 4.50, 10, 0, &safety_id),
    )?;
    let helmet = a004_product::service::create(
        store,
        &system,
        product("CAS-SEG", "Casco de seguridad", "Seguridad", 12.75, 40, 5, &safety_id),
    )?;

    // Счета: через сервис, чтобы остатки учитывали движения
    let sale = |client: &str, status: InvoiceStatus, days: i64, lines: Vec<InvoiceLineDto>| {
        let mut dto = InvoiceDto::new(InvoiceKind::Sale);
        dto.client_id = Some(client.to_string());
        dto.employee_id = Some(sales.to_string_id());
        dto.warehouse_id = Some(central.to_string_id());
        dto.status = Some(status);
        dto.issue_date = Some(days_ago(days));
        dto.due_date = Some(days_ago(days - 30));
        dto.payment_method = Some(PaymentMethod::Transfer);
        dto.lines = lines;
        dto
    };
    let purchase = |supplier: &str, status: InvoiceStatus, days: i64, lines: Vec<InvoiceLineDto>| {
        let mut dto = InvoiceDto::new(InvoiceKind::Purchase);
        dto.supplier_id = Some(supplier.to_string());
        dto.employee_id = Some(storekeeper.to_string_id());
        dto.warehouse_id = Some(central.to_string_id());
        dto.status = Some(status);
        dto.issue_date = Some(days_ago(days));
        dto.lines = lines;
        dto
    };

    let bolt_id = bolt.to_string_id();
    let nut_id = nut.to_string_id();
    let drill_id = drill.to_string_id();
    let gloves_id = gloves.to_string_id();
    let helmet_id = helmet.to_string_id();

    let invoices = vec![
        purchase(
            &steel_id,
            InvoiceStatus::Paid,
            20,
            vec![line(&bolt_id, 200, None), line(&nut_id, 200, None)],
        ),
        sale(
            &ruiz.to_string_id(),
            InvoiceStatus::Paid,
            15,
            vec![line(&bolt_id, 150, Some(5.0)), line(&nut_id, 150, Some(5.0))],
        ),
        sale(
            &garcia.to_string_id(),
            InvoiceStatus::Pending,
            7,
            vec![line(&drill_id, 2, None), line(&helmet_id, 4, None)],
        ),
        sale(
            &costa.to_string_id(),
            InvoiceStatus::Draft,
            2,
            vec![line(&gloves_id, 6, None)],
        ),
        purchase(
            &safety_id,
            InvoiceStatus::Pending,
            1,
            vec![line(&gloves_id, 50, None), line(&helmet_id, 20, None)],
        ),
    ];
    let count = invoices.len();
    for dto in invoices {
        a006_invoice::service::create(store, &system, dto)?;
    }

    tracing::info!(
        "Demo data loaded: {} clients, {} products, {} invoices",
        store.clients.len(),
        store.products.len(),
        count
    );
    Ok(())
}
