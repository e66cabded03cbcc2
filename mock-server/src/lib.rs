use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, FromRequestParts, Path, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    routing::post,
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

/// Uniform reply body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    pub message: String,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub transaction_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: Option<String>,
    pub transaction_date: NaiveDate,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransaction {
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub transaction_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expense: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    pub name: String,
    pub mobile_number: Option<String>,
}

#[derive(Deserialize)]
pub struct SignUp {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct SignIn {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthToken {
    pub access_token: String,
}

struct Account {
    profile: UserProfile,
    password: String,
}

#[derive(Default)]
pub struct Store {
    accounts: HashMap<i64, Account>,
    tokens: HashMap<String, i64>,
    transactions: HashMap<i64, Transaction>,
    next_user_id: i64,
    next_transaction_id: i64,
    next_token: u64,
}

impl Store {
    fn issue_token(&mut self, user_id: i64) -> String {
        self.next_token += 1;
        let token = format!("token-{user_id}-{}", self.next_token);
        self.tokens.insert(token.clone(), user_id);
        token
    }

    fn owned(&self, user_id: i64, id: i64) -> Result<&Transaction, ApiFailure> {
        self.transactions
            .get(&id)
            .filter(|tx| tx.user_id == user_id)
            .ok_or_else(transaction_not_found)
    }

    fn owned_mut(&mut self, user_id: i64, id: i64) -> Result<&mut Transaction, ApiFailure> {
        self.transactions
            .get_mut(&id)
            .filter(|tx| tx.user_id == user_id)
            .ok_or_else(transaction_not_found)
    }
}

pub type Db = Arc<RwLock<Store>>;

/// `success: false` reply with its status code.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl ApiFailure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = Envelope {
            success: false,
            data: serde_json::Value::Null,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiFailure {
    fn from(rejection: JsonRejection) -> Self {
        ApiFailure::new(rejection.status(), rejection.body_text())
    }
}

fn transaction_not_found() -> ApiFailure {
    ApiFailure::new(StatusCode::NOT_FOUND, "Transaction not found")
}

type ApiResult<T> = Result<(StatusCode, Json<Envelope<T>>), ApiFailure>;

fn ok<T>(status: StatusCode, data: T, message: &str) -> ApiResult<T> {
    Ok((
        status,
        Json(Envelope {
            success: true,
            data,
            message: message.to_string(),
        }),
    ))
}

/// Id of the user behind the request's bearer token.
pub struct CurrentUser(pub i64);

impl FromRequestParts<Db> for CurrentUser {
    type Rejection = ApiFailure;

    async fn from_request_parts(parts: &mut Parts, db: &Db) -> Result<Self, Self::Rejection> {
        let unauthorized = || ApiFailure::new(StatusCode::UNAUTHORIZED, "Unauthorized");
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(unauthorized)?;
        let store = db.read().await;
        store
            .tokens
            .get(token)
            .copied()
            .map(CurrentUser)
            .ok_or_else(unauthorized)
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/auth/signup", post(sign_up))
        .route("/auth/signin", post(sign_in))
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route("/transactions/summary", get(summary))
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
        .route("/user/profile", get(get_profile).put(update_profile))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn sign_up(
    State(db): State<Db>,
    input: Result<Json<SignUp>, JsonRejection>,
) -> ApiResult<AuthToken> {
    let Json(input) = input?;
    if input.password.len() < 6 {
        return Err(ApiFailure::new(
            StatusCode::BAD_REQUEST,
            "Password must be at least 6 characters",
        ));
    }
    let mut store = db.write().await;
    if store.accounts.values().any(|a| a.profile.email == input.email) {
        return Err(ApiFailure::new(StatusCode::CONFLICT, "Email already exists"));
    }
    store.next_user_id += 1;
    let id = store.next_user_id;
    store.accounts.insert(
        id,
        Account {
            profile: UserProfile {
                id,
                email: input.email,
                name: input.name,
                mobile_number: None,
                created_at: Utc::now(),
            },
            password: input.password,
        },
    );
    let access_token = store.issue_token(id);
    tracing::info!(user_id = id, "user signed up");
    ok(StatusCode::CREATED, AuthToken { access_token }, "User registered successfully")
}

async fn sign_in(
    State(db): State<Db>,
    input: Result<Json<SignIn>, JsonRejection>,
) -> ApiResult<AuthToken> {
    let Json(input) = input?;
    let mut store = db.write().await;
    let id = store
        .accounts
        .values()
        .find(|a| a.profile.email == input.email && a.password == input.password)
        .map(|a| a.profile.id)
        .ok_or_else(|| ApiFailure::new(StatusCode::UNAUTHORIZED, "Invalid credentials"))?;
    let access_token = store.issue_token(id);
    ok(StatusCode::OK, AuthToken { access_token }, "Signed in successfully")
}

async fn list_transactions(
    State(db): State<Db>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<Vec<Transaction>> {
    let store = db.read().await;
    let mut transactions: Vec<Transaction> = store
        .transactions
        .values()
        .filter(|tx| tx.user_id == user_id)
        .cloned()
        .collect();
    transactions.sort_by(|a, b| {
        b.transaction_date
            .cmp(&a.transaction_date)
            .then(b.id.cmp(&a.id))
    });
    ok(StatusCode::OK, transactions, "")
}

async fn create_transaction(
    State(db): State<Db>,
    CurrentUser(user_id): CurrentUser,
    input: Result<Json<CreateTransaction>, JsonRejection>,
) -> ApiResult<Transaction> {
    let Json(input) = input?;
    if input.category.trim().is_empty() {
        return Err(ApiFailure::new(StatusCode::BAD_REQUEST, "Category is required"));
    }
    if input.amount <= Decimal::ZERO {
        return Err(ApiFailure::new(
            StatusCode::BAD_REQUEST,
            "Amount must be greater than 0",
        ));
    }
    let mut store = db.write().await;
    store.next_transaction_id += 1;
    let now = Utc::now();
    let tx = Transaction {
        id: store.next_transaction_id,
        user_id,
        kind: input.kind,
        category: input.category,
        amount: input.amount,
        description: input.description,
        transaction_date: input.transaction_date,
        created_at: now,
        updated_at: now,
    };
    store.transactions.insert(tx.id, tx.clone());
    ok(StatusCode::CREATED, tx, "Transaction created successfully")
}

async fn summary(State(db): State<Db>, CurrentUser(user_id): CurrentUser) -> ApiResult<Summary> {
    let store = db.read().await;
    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    for tx in store.transactions.values().filter(|tx| tx.user_id == user_id) {
        match tx.kind {
            TransactionType::Income => total_income += tx.amount,
            TransactionType::Expense => total_expense += tx.amount,
        }
    }
    ok(
        StatusCode::OK,
        Summary {
            total_income,
            total_expense,
            balance: total_income - total_expense,
        },
        "",
    )
}

async fn get_transaction(
    State(db): State<Db>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Transaction> {
    let store = db.read().await;
    let tx = store.owned(user_id, id)?.clone();
    ok(StatusCode::OK, tx, "")
}

async fn update_transaction(
    State(db): State<Db>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i64>,
    input: Result<Json<UpdateTransaction>, JsonRejection>,
) -> ApiResult<Transaction> {
    let Json(input) = input?;
    if matches!(input.amount, Some(amount) if amount <= Decimal::ZERO) {
        return Err(ApiFailure::new(
            StatusCode::BAD_REQUEST,
            "Amount must be greater than 0",
        ));
    }
    let mut store = db.write().await;
    let tx = store.owned_mut(user_id, id)?;
    if let Some(kind) = input.kind {
        tx.kind = kind;
    }
    if let Some(category) = input.category {
        tx.category = category;
    }
    if let Some(amount) = input.amount {
        tx.amount = amount;
    }
    if let Some(description) = input.description {
        tx.description = Some(description);
    }
    if let Some(date) = input.transaction_date {
        tx.transaction_date = date;
    }
    tx.updated_at = Utc::now();
    ok(StatusCode::OK, tx.clone(), "Transaction updated successfully")
}

async fn delete_transaction(
    State(db): State<Db>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    let mut store = db.write().await;
    store.owned(user_id, id)?;
    store.transactions.remove(&id);
    ok(StatusCode::OK, (), "Transaction deleted successfully")
}

async fn get_profile(
    State(db): State<Db>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<UserProfile> {
    let store = db.read().await;
    let account = store
        .accounts
        .get(&user_id)
        .ok_or_else(|| ApiFailure::new(StatusCode::NOT_FOUND, "User not found"))?;
    ok(StatusCode::OK, account.profile.clone(), "")
}

async fn update_profile(
    State(db): State<Db>,
    CurrentUser(user_id): CurrentUser,
    input: Result<Json<UpdateProfile>, JsonRejection>,
) -> ApiResult<UserProfile> {
    let Json(input) = input?;
    if input.name.trim().is_empty() {
        return Err(ApiFailure::new(StatusCode::BAD_REQUEST, "Name is required"));
    }
    let mut store = db.write().await;
    let account = store
        .accounts
        .get_mut(&user_id)
        .ok_or_else(|| ApiFailure::new(StatusCode::NOT_FOUND, "User not found"))?;
    account.profile.name = input.name;
    account.profile.mobile_number = input.mobile_number.filter(|m| !m.trim().is_empty());
    ok(StatusCode::OK, account.profile.clone(), "Profile updated successfully")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_keeps_status_code() {
        let response = ApiFailure::new(StatusCode::NOT_FOUND, "Not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn transaction_serializes_to_camel_case() {
        let tx = Transaction {
            id: 1,
            user_id: 2,
            kind: TransactionType::Expense,
            category: "Food".to_string(),
            amount: Decimal::new(125, 1),
            description: None,
            transaction_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["userId"], 2);
        assert_eq!(json["type"], "expense");
        assert_eq!(json["amount"], 12.5);
        assert_eq!(json["transactionDate"], "2024-05-01");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn create_transaction_rejects_missing_category() {
        let result: Result<CreateTransaction, _> = serde_json::from_str(
            r#"{"type":"income","amount":10,"transactionDate":"2024-01-01"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn update_transaction_all_fields_optional() {
        let input: UpdateTransaction = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.kind.is_none());
        assert!(input.amount.is_none());
        assert!(input.category.is_none());
    }

    #[test]
    fn update_transaction_partial_fields() {
        let input: UpdateTransaction = serde_json::from_str(r#"{"amount":7.25}"#).unwrap();
        assert_eq!(input.amount, Some(Decimal::new(725, 2)));
        assert!(input.category.is_none());
    }

    #[test]
    fn issued_tokens_are_unique() {
        let mut store = Store::default();
        let a = store.issue_token(1);
        let b = store.issue_token(1);
        assert_ne!(a, b);
        assert_eq!(store.tokens.get(&a), Some(&1));
    }

    #[test]
    fn lookups_are_scoped_to_the_owner() {
        let mut store = Store::default();
        let now = Utc::now();
        store.transactions.insert(
            1,
            Transaction {
                id: 1,
                user_id: 7,
                kind: TransactionType::Income,
                category: "Salary".to_string(),
                amount: Decimal::from(100),
                description: None,
                transaction_date: now.date_naive(),
                created_at: now,
                updated_at: now,
            },
        );

        assert_eq!(store.owned(7, 1).unwrap().category, "Salary");
        assert_eq!(store.owned(8, 1).unwrap_err().status, StatusCode::NOT_FOUND);
        assert!(store.owned(7, 2).is_err());
        assert!(store.owned_mut(8, 1).is_err());
    }
}
