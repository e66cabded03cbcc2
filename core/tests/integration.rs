//! Full client lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every domain
//! client over real HTTP through `UreqTransport`. Validates that request
//! building, bearer attachment and envelope parsing work end-to-end with the
//! actual server, and that the session survives a restart through the file
//! medium.

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::NaiveDate;
use finance_core::{
    ApiError, ClientConfig, ErrorKind, FinanceApi, FormEvent, MemoryTokenStorage, SignInRequest,
    SignUpRequest, TransactionForm, TransactionType, UpdateProfile, UpdateTransaction,
    UreqTransport,
};
use rust_decimal::Decimal;

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn memory_api(addr: SocketAddr) -> FinanceApi {
    FinanceApi::with_parts(
        &format!("http://{addr}"),
        Box::new(MemoryTokenStorage::new()),
        Arc::new(UreqTransport::new()),
    )
    .unwrap()
}

fn sign_up(api: &FinanceApi, email: &str) {
    let credential = api
        .auth
        .sign_up(&SignUpRequest {
            name: "Ann".to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
        })
        .unwrap();
    api.login(credential).unwrap();
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
}

#[test]
fn crud_lifecycle() {
    let addr = start_server();
    let api = memory_api(addr);

    // Step 1: protected call before login is rejected by the server.
    let err = api.transactions.list().unwrap_err();
    assert!(matches!(&err, ApiError::Domain { message } if message == "Unauthorized"));

    // Step 2: sign up and keep the credential.
    sign_up(&api, "a@b.com");
    assert!(api.is_authenticated());

    // Step 3: dashboard is empty.
    let dashboard = api.dashboard().unwrap();
    assert!(dashboard.transactions.is_empty());
    assert_eq!(dashboard.summary.balance, Decimal::ZERO);

    // Step 4: add an expense through the form.
    let mut form = TransactionForm::new(date(1));
    form.apply(FormEvent::SetCategory("Food".to_string()));
    form.apply(FormEvent::SetAmount("12.5".to_string()));
    let created = api.transactions.create(&form.submit().unwrap()).unwrap();
    assert_eq!(created.kind, TransactionType::Expense);
    assert_eq!(created.amount, Decimal::new(125, 1));
    let id = created.id;

    // Step 5: add an income.
    form.reset();
    form.apply(FormEvent::SetKind(TransactionType::Income));
    form.apply(FormEvent::SetCategory("Salary".to_string()));
    form.apply(FormEvent::SetAmount("100".to_string()));
    form.apply(FormEvent::SetDate(date(2)));
    api.transactions.create(&form.submit().unwrap()).unwrap();

    // Step 6: get the created transaction.
    let fetched = api.transactions.get(id).unwrap();
    assert_eq!(fetched, created);

    // Step 7: partial update keeps untouched fields.
    let updated = api
        .transactions
        .update(
            id,
            &UpdateTransaction {
                description: Some("lunch".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.category, "Food");
    assert_eq!(updated.description.as_deref(), Some("lunch"));

    // Step 8: summary reflects both transactions.
    let summary = api.transactions.summary().unwrap();
    assert_eq!(summary.total_income, Decimal::from(100));
    assert_eq!(summary.total_expense, Decimal::new(125, 1));
    assert_eq!(summary.balance, Decimal::new(875, 1));

    // Step 9: server-side validation surfaces as a domain error.
    let mut bad = form.submit().unwrap();
    bad.amount = Decimal::ZERO;
    let err = api.transactions.create(&bad).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Domain);
    assert_eq!(err.to_string(), "Amount must be greater than 0");

    // Step 10: delete, then delete again.
    api.transactions.delete(id).unwrap();
    let err = api.transactions.delete(id).unwrap_err();
    assert!(matches!(&err, ApiError::Domain { message } if message == "Transaction not found"));

    // Step 11: list has only the income left.
    let list = api.transactions.list().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].category, "Salary");

    // Step 12: logout drops authorization again.
    api.logout().unwrap();
    assert!(!api.is_authenticated());
    assert_eq!(api.transactions.summary().unwrap_err().kind(), ErrorKind::Domain);
}

#[test]
fn sign_in_with_existing_account() {
    let addr = start_server();
    let api = memory_api(addr);
    sign_up(&api, "a@b.com");
    api.logout().unwrap();

    let err = api
        .auth
        .sign_in(&SignInRequest {
            email: "a@b.com".to_string(),
            password: "wrong12".to_string(),
        })
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid credentials");
    assert!(!api.is_authenticated());

    let credential = api
        .auth
        .sign_in(&SignInRequest {
            email: "a@b.com".to_string(),
            password: "secret1".to_string(),
        })
        .unwrap();
    api.login(credential).unwrap();
    assert_eq!(api.user.profile().unwrap().email, "a@b.com");
}

#[test]
fn profile_update() {
    let addr = start_server();
    let api = memory_api(addr);
    sign_up(&api, "a@b.com");

    let profile = api.user.profile().unwrap();
    assert_eq!(profile.name, "Ann");
    assert!(profile.mobile_number.is_none());

    let updated = api
        .user
        .update_profile(&UpdateProfile {
            name: "Annie".to_string(),
            mobile_number: Some("555-0100".to_string()),
        })
        .unwrap();
    assert_eq!(updated.name, "Annie");
    assert_eq!(updated.email, profile.email);
    assert_eq!(updated.mobile_number.as_deref(), Some("555-0100"));
}

#[test]
fn session_persists_across_restarts() {
    let addr = start_server();
    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig::new(format!("http://{addr}"), dir.path().join("session.json"));

    let api = FinanceApi::from_config(&config).unwrap();
    sign_up(&api, "a@b.com");
    drop(api);

    let reopened = FinanceApi::from_config(&config).unwrap();
    assert!(reopened.is_authenticated());
    assert_eq!(reopened.user.profile().unwrap().name, "Ann");

    reopened.logout().unwrap();
    let after_logout = FinanceApi::from_config(&config).unwrap();
    assert!(!after_logout.is_authenticated());
}

#[test]
fn unreachable_server_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = memory_api(addr);
    let err = api.transactions.list().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}
