//! Движение остатков по счетам.
//!
//! Продажа (кроме отменённой) списывает количество, оплаченная закупка
//! приходует. Количества по одному товару суммируются по всем строкам.

use std::collections::BTreeMap;

use contracts::domain::a004_product::aggregate::{Product, ProductId};
use contracts::domain::a006_invoice::aggregate::Invoice;
use contracts::domain::common::{AggregateId, AggregateRoot};

use crate::shared::data::store::MockStore;
use crate::shared::error::{ErpError, ErpResult};

/// Изменение остатка по товарам: товар -> дельта
pub type StockImpact = BTreeMap<ProductId, i64>;

fn too_large(what: &str) -> ErpError {
    ErpError::validation(format!("Quantity for '{}' is too large", what))
}

/// Движение по счёту. Строка с неизвестным товаром или количество,
/// не помещающееся в i64, дают ошибку.
pub fn impact(invoice: &Invoice) -> ErpResult<StockImpact> {
    let direction = invoice.stock_direction();
    let mut deltas = StockImpact::new();
    if direction == 0 {
        return Ok(deltas);
    }
    for line in &invoice.lines {
        let id = ProductId::from_string(&line.product_id).map_err(|_| ErpError::NotFound {
            entity: Product::element_name(),
        })?;
        let delta = line
            .quantity
            .checked_mul(direction)
            .ok_or_else(|| too_large(&line.description))?;
        let total = deltas.entry(id).or_insert(0);
        // i64::MIN не имеет противоположного значения, откат был бы невозможен
        *total = total
            .checked_add(delta)
            .filter(|t| *t != i64::MIN)
            .ok_or_else(|| too_large(&line.description))?;
    }
    deltas.retain(|_, delta| *delta != 0);
    Ok(deltas)
}

pub fn negate(impact: &StockImpact) -> StockImpact {
    impact.iter().map(|(id, delta)| (*id, -delta)).collect()
}

/// Каждый товар после применения дельты должен остаться с остатком >= 0
pub fn check(store: &MockStore, impact: &StockImpact) -> ErpResult<()> {
    for (id, delta) in impact {
        let product = store.products.get(*id).ok_or(ErpError::NotFound {
            entity: Product::element_name(),
        })?;
        match product.stock.checked_add(*delta) {
            None => {
                return Err(ErpError::validation(format!(
                    "Stock of {} would exceed the maximum",
                    product.base.code
                )))
            }
            Some(after) if after < 0 => {
                return Err(ErpError::InsufficientStock {
                    product: product.base.code.clone(),
                    available: product.stock,
                    requested: (-delta).max(0),
                });
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Применить дельты без проверки: после `check` или для отката уже
/// применённого движения
pub fn apply(store: &mut MockStore, impact: &StockImpact) {
    for (id, delta) in impact {
        if let Some(product) = store.products.get_mut(*id) {
            product.stock = product.stock.saturating_add(*delta);
            product.base.touch();
        }
    }
}

pub fn apply_checked(store: &mut MockStore, impact: &StockImpact) -> ErpResult<()> {
    check(store, impact)?;
    apply(store, impact);
    Ok(())
}

/// Заменить движение `old` на `new`.
///
/// Сначала откатывается старое движение, затем новое проверяется от
/// полученной базы. При нехватке откат отменяется, остатки остаются прежними.
pub fn replace(store: &mut MockStore, old: &StockImpact, new: &StockImpact) -> ErpResult<()> {
    apply(store, &negate(old));

    // товары, которые ушли из счёта, тоже проверяются: откат оплаченной
    // закупки не может увести остаток в минус
    let mut target = new.clone();
    for id in old.keys() {
        target.entry(*id).or_insert(0);
    }

    if let Err(e) = check(store, &target) {
        apply(store, old);
        return Err(e);
    }
    apply(store, new);
    Ok(())
}

/// Товары, затронутые хотя бы одним из движений
pub fn affected(impacts: &[&StockImpact]) -> Vec<ProductId> {
    let mut ids: Vec<ProductId> = impacts.iter().flat_map(|i| i.keys().copied()).collect();
    ids.sort();
    ids.dedup();
    ids
}
