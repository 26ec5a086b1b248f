//! # Expense Handlers
//!
//! HTTP request handlers for the general expense ("pengeluaran") ledger.
//! The expense total is always the sum of its line items; creation and
//! growth are guarded by an advisory balance check.

use ::auth::permissions::ExpenseAction;
use ::auth::Permission;
use axum::Json;
use chrono::Utc;
use entity::expense_items::{self, Entity as ItemsEntity};
use entity::expenses::{self, Entity as ExpensesEntity};
use error::PaginationMeta;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
    Set,
};
use validator::Validate;

use crate::balance::ensure_covered;
use crate::dto::expenses::{
    CreateExpenseRequest,
    ExpenseItemRequest,
    ExpenseListQuery,
    ExpenseListResponse,
    ExpenseResponse,
    UpdateExpenseRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::permissions::check_permission;
use crate::utils::{escape_like_wildcards, slugify};
use crate::{AppError, AppState, Result};

/// Inner handler: create an expense with its line items.
pub async fn create_expense_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    req: CreateExpenseRequest,
) -> Result<Json<ExpenseResponse>> {
    req.validate().map_err(AppError::from)?;
    check_permission(user, Permission::Expenses(ExpenseAction::Create))?;

    let total = items_total(&req.items)?;
    ensure_covered(state, total).await?;

    let slug = unique_slug(state, &req.title, None).await?;
    let now = Utc::now();
    let expense = expenses::ActiveModel {
        id:         Set(entity::new_id("exp")),
        title:      Set(req.title),
        slug:       Set(slug),
        total:      Set(total),
        created_by: Set(user.id.clone()),
        event_id:   Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    let items = insert_items(state, &expense.id, &req.items).await?;

    logging::info!(target: "expenses", expense_id = %expense.id, total = %total, created_by = %user.id, "Expense created");

    Ok(Json(ExpenseResponse::from_parts(expense, items)))
}

/// Inner handler: paginated expense list.
pub async fn list_expenses_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    query: ExpenseListQuery,
) -> Result<Json<ExpenseListResponse>> {
    check_permission(user, Permission::Expenses(ExpenseAction::Read))?;

    let mut select = ExpensesEntity::find();
    if let Some(ref term) = query.search {
        let pattern = format!("%{}%", escape_like_wildcards(term.trim()));
        select = select.filter(expenses::Column::Title.like(pattern));
    }

    let total = select.clone().count(&state.db).await?;
    let pagination = PaginationMeta::new(query.page(), query.per_page(), total);

    let records = select
        .order_by_desc(expenses::Column::CreatedAt)
        .offset(pagination.offset())
        .limit(pagination.limit())
        .all(&state.db)
        .await?;

    let ids: Vec<String> = records.iter().map(|e| e.id.clone()).collect();
    let mut items_by_expense: std::collections::HashMap<String, Vec<expense_items::Model>> =
        std::collections::HashMap::new();
    for item in ItemsEntity::find()
        .filter(expense_items::Column::ExpenseId.is_in(ids))
        .all(&state.db)
        .await?
    {
        items_by_expense.entry(item.expense_id.clone()).or_default().push(item);
    }

    let expenses = records
        .into_iter()
        .map(|e| {
            let items = items_by_expense.remove(&e.id).unwrap_or_default();
            ExpenseResponse::from_parts(e, items)
        })
        .collect();

    Ok(Json(ExpenseListResponse { expenses, pagination }))
}

/// Inner handler: fetch one expense with its items.
pub async fn get_expense_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    expense_id: &str,
) -> Result<Json<ExpenseResponse>> {
    check_permission(user, Permission::Expenses(ExpenseAction::Read))?;

    let expense = find_expense(state, expense_id).await?;
    let items = ItemsEntity::find()
        .filter(expense_items::Column::ExpenseId.eq(expense_id))
        .all(&state.db)
        .await?;

    Ok(Json(ExpenseResponse::from_parts(expense, items)))
}

/// Inner handler: update an expense, optionally replacing its line items.
///
/// When the replacement items raise the total, the increase is checked
/// against the current balance.
pub async fn update_expense_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    expense_id: &str,
    req: UpdateExpenseRequest,
) -> Result<Json<ExpenseResponse>> {
    req.validate().map_err(AppError::from)?;
    check_permission(user, Permission::Expenses(ExpenseAction::Update))?;

    let expense = find_expense(state, expense_id).await?;
    let old_total = expense.total;

    let new_total = match req.items {
        Some(ref items) => {
            let total = items_total(items)?;
            if total > old_total {
                ensure_covered(state, total - old_total).await?;
            }
            Some(total)
        },
        None => None,
    };

    let mut active: expenses::ActiveModel = expense.into();
    if let Some(title) = req.title {
        active.slug = Set(unique_slug(state, &title, Some(expense_id)).await?);
        active.title = Set(title);
    }
    if let Some(total) = new_total {
        active.total = Set(total);
    }
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    let items = match req.items {
        Some(ref items) => {
            ItemsEntity::delete_many()
                .filter(expense_items::Column::ExpenseId.eq(expense_id))
                .exec(&state.db)
                .await?;
            insert_items(state, expense_id, items).await?
        },
        None => {
            ItemsEntity::find()
                .filter(expense_items::Column::ExpenseId.eq(expense_id))
                .all(&state.db)
                .await?
        },
    };

    logging::info!(target: "expenses", expense_id = %expense_id, updated_by = %user.id, "Expense updated");

    Ok(Json(ExpenseResponse::from_parts(updated, items)))
}

/// Inner handler: delete an expense and its items.
pub async fn delete_expense_inner(state: &AppState, user: &AuthenticatedUser, expense_id: &str) -> Result<()> {
    check_permission(user, Permission::Expenses(ExpenseAction::Delete))?;

    find_expense(state, expense_id).await?;

    ItemsEntity::delete_many()
        .filter(expense_items::Column::ExpenseId.eq(expense_id))
        .exec(&state.db)
        .await?;
    ExpensesEntity::delete_by_id(expense_id).exec(&state.db).await?;

    logging::info!(target: "expenses", expense_id = %expense_id, deleted_by = %user.id, "Expense deleted");

    Ok(())
}

async fn find_expense(state: &AppState, expense_id: &str) -> Result<expenses::Model> {
    ExpensesEntity::find_by_id(expense_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Expense not found"))
}

fn items_total(items: &[ExpenseItemRequest]) -> Result<Decimal> {
    let mut total = Decimal::ZERO;
    for item in items {
        if item.price <= Decimal::ZERO {
            return Err(AppError::bad_request("Item prices must be positive"));
        }
        total += item.price;
    }
    Ok(total)
}

async fn insert_items(
    state: &AppState,
    expense_id: &str,
    items: &[ExpenseItemRequest],
) -> Result<Vec<expense_items::Model>> {
    let now = Utc::now();
    let mut created = Vec::with_capacity(items.len());
    for item in items {
        let model = expense_items::ActiveModel {
            id:         Set(entity::new_id("itm")),
            expense_id: Set(expense_id.to_string()),
            name:       Set(item.name.clone()),
            price:      Set(item.price),
            image:      Set(item.image.clone()),
            created_at: Set(now),
        }
        .insert(&state.db)
        .await?;
        created.push(model);
    }
    Ok(created)
}

/// Derive a slug unique among expenses, appending a counter on clashes.
/// `exclude_id` keeps an expense from clashing with itself on rename.
pub(crate) async fn unique_slug(state: &AppState, title: &str, exclude_id: Option<&str>) -> Result<String> {
    let base = {
        let slug = slugify(title);
        if slug.is_empty() { "pengeluaran".to_string() } else { slug }
    };

    let mut candidate = base.clone();
    let mut counter = 1;
    loop {
        let mut query = ExpensesEntity::find().filter(expenses::Column::Slug.eq(candidate.clone()));
        if let Some(id) = exclude_id {
            query = query.filter(expenses::Column::Id.ne(id));
        }
        if query.one(&state.db).await?.is_none() {
            return Ok(candidate);
        }
        counter += 1;
        candidate = format!("{}-{}", base, counter);
    }
}
