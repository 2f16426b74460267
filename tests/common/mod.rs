//! In-process mock of the directory backend.
//!
//! Serves the auth endpoints and four collections from memory, records every
//! request it receives, and can be told to fail logout or slow down pages.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::{
    Json, Router,
    body::to_bytes,
    extract::{FromRequest, Multipart, Path, Query, Request, State},
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use fake::Fake;
use fake::faker::address::en::CityName;
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName, Name};
use medadmin::router::{Navigator, Route};
use medadmin::state::AppState;
use medadmin_auth::MemoryTokenStore;
use medadmin_config::ApiConfig;
use serde_json::{Map, Value, json};
use uuid::Uuid;

/// One request as the backend saw it.
#[derive(Debug, Clone, Default)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub authorization: Option<String>,
    pub json: Option<Value>,
    pub fields: Vec<(String, String)>,
    pub files: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_query(&self, name: &str) -> bool {
        self.query.iter().any(|(k, _)| k == name)
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_file(&self, name: &str) -> bool {
        self.files.iter().any(|(k, _)| k == name)
    }
}

struct Account {
    email: String,
    password: String,
    user: Value,
}

#[derive(Default)]
struct Inner {
    accounts: Vec<Account>,
    tokens: HashMap<String, Value>,
    collections: HashMap<String, Vec<Value>>,
    requests: Vec<RecordedRequest>,
    fail_logout: bool,
    page_delays: HashMap<u32, Duration>,
    next_id: u64,
}

impl Inner {
    fn record(&mut self, method: &Method, uri: &Uri, headers: &HeaderMap) -> usize {
        let query = reqwest::Url::parse(&format!("http://mock{}", uri))
            .map(|url| url.query_pairs().into_owned().collect())
            .unwrap_or_default();
        self.requests.push(RecordedRequest {
            method: method.to_string(),
            path: uri.path().trim_start_matches("/api").to_string(),
            query,
            authorization: headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            ..Default::default()
        });
        self.requests.len() - 1
    }

    fn attach_body(&mut self, index: usize, body: &ReceivedBody) {
        let request = &mut self.requests[index];
        match body {
            ReceivedBody::Json(value) => request.json = Some(value.clone()),
            ReceivedBody::Multipart { fields, files } => {
                request.fields = fields.clone();
                request.files = files.clone();
            }
            ReceivedBody::Empty => {}
        }
    }

    fn caller(&self, headers: &HeaderMap) -> Option<&Value> {
        let token = headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?;
        self.tokens.get(token)
    }

    fn is_admin(&self, headers: &HeaderMap) -> bool {
        self.caller(headers)
            .is_some_and(|user| user["role"].as_str() == Some("admin"))
    }

    fn next_id(&mut self, collection: &str) -> String {
        self.next_id += 1;
        let prefix = collection.trim_end_matches('s');
        format!("{}-{}", prefix, self.next_id)
    }
}

#[derive(Clone, Default)]
struct Ctx {
    inner: Arc<Mutex<Inner>>,
}

impl Ctx {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }
}

enum ReceivedBody {
    Json(Value),
    Multipart {
        fields: Vec<(String, String)>,
        files: Vec<(String, String)>,
    },
    Empty,
}

impl ReceivedBody {
    fn into_object(self) -> Map<String, Value> {
        match self {
            ReceivedBody::Json(Value::Object(map)) => map,
            ReceivedBody::Json(_) | ReceivedBody::Empty => Map::new(),
            ReceivedBody::Multipart { fields, files } => {
                let mut map = Map::new();
                for (name, value) in fields {
                    match name.split_once('[') {
                        Some((list, _)) => {
                            let entry = map
                                .entry(list.to_string())
                                .or_insert_with(|| Value::Array(Vec::new()));
                            if let Value::Array(items) = entry {
                                items.push(Value::String(value));
                            }
                        }
                        None => {
                            map.insert(name, Value::String(value));
                        }
                    }
                }
                if let (Some(lat), Some(long)) = (map.remove("latitude"), map.remove("longitude")) {
                    map.insert("location".into(), json!({"latitude": lat, "longitude": long}));
                }
                for (field, file_name) in files {
                    map.insert(
                        format!("{}Url", field),
                        Value::String(format!("https://cdn.test/{}", file_name)),
                    );
                }
                map
            }
        }
    }
}

async fn read_body(req: Request) -> Result<ReceivedBody, Response> {
    let is_multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    if is_multipart {
        let mut multipart = Multipart::from_request(req, &())
            .await
            .map_err(IntoResponse::into_response)?;
        let mut fields = Vec::new();
        let mut files = Vec::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(IntoResponse::into_response)?
        {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let _ = field.bytes().await;
                    files.push((name, file_name));
                }
                None => {
                    let value = field.text().await.map_err(IntoResponse::into_response)?;
                    fields.push((name, value));
                }
            }
        }
        return Ok(ReceivedBody::Multipart { fields, files });
    }

    let bytes = to_bytes(req.into_body(), usize::MAX)
        .await
        .map_err(|_| StatusCode::BAD_REQUEST.into_response())?;
    if bytes.is_empty() {
        return Ok(ReceivedBody::Empty);
    }
    serde_json::from_slice(&bytes)
        .map(ReceivedBody::Json)
        .map_err(|_| StatusCode::BAD_REQUEST.into_response())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Unauthorized", "statusCode": 401})),
    )
        .into_response()
}

fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"message": format!("{} not found", what), "statusCode": 404})),
    )
        .into_response()
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn matches_filters(item: &Value, query: &[(String, String)]) -> bool {
    query
        .iter()
        .filter(|(k, _)| k != "page" && k != "limit")
        .all(|(key, expected)| {
            if key == "search" {
                let needle = expected.to_lowercase();
                return item.as_object().is_some_and(|map| {
                    map.values()
                        .filter_map(Value::as_str)
                        .any(|v| v.to_lowercase().contains(&needle))
                });
            }
            item.get(key).and_then(value_text).as_deref() == Some(expected.as_str())
        })
}

// ---- auth ----

async fn login(State(ctx): State<Ctx>, req: Request) -> Response {
    let (method, uri, headers) = (req.method().clone(), req.uri().clone(), req.headers().clone());
    let body = match read_body(req).await {
        Ok(body) => body,
        Err(response) => return response,
    };

    let mut inner = ctx.lock();
    let index = inner.record(&method, &uri, &headers);
    inner.attach_body(index, &body);

    let credentials = body.into_object();
    let email = credentials.get("email").and_then(Value::as_str).unwrap_or_default();
    let password = credentials
        .get("password")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let Some(user) = inner
        .accounts
        .iter()
        .find(|a| a.email == email && a.password == password)
        .map(|a| a.user.clone())
    else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid credentials", "statusCode": 401})),
        )
            .into_response();
    };

    let access_token = format!("access-{}", Uuid::new_v4());
    inner.tokens.insert(access_token.clone(), user.clone());
    Json(json!({
        "access_token": access_token,
        "refresh_token": format!("refresh-{}", Uuid::new_v4()),
        "user": user,
    }))
    .into_response()
}

async fn me(State(ctx): State<Ctx>, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    let mut inner = ctx.lock();
    inner.record(&method, &uri, &headers);
    match inner.caller(&headers) {
        Some(user) => Json(user.clone()).into_response(),
        None => unauthorized(),
    }
}

async fn logout(State(ctx): State<Ctx>, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    let mut inner = ctx.lock();
    inner.record(&method, &uri, &headers);
    if inner.fail_logout {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

// ---- collections ----

async fn list_items(
    ctx: Ctx,
    collection: &str,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    query: Vec<(String, String)>,
) -> Response {
    let param = |name: &str, default: usize| {
        query
            .iter()
            .find(|(k, _)| k == name)
            .and_then(|(_, v)| v.parse::<usize>().ok())
            .unwrap_or(default)
            .max(1)
    };
    let page = param("page", 1);
    let limit = param("limit", 10);

    let delay = {
        let mut inner = ctx.lock();
        inner.record(&method, &uri, &headers);
        if !inner.is_admin(&headers) {
            return unauthorized();
        }
        inner.page_delays.get(&(page as u32)).copied()
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let inner = ctx.lock();
    let matching: Vec<Value> = inner
        .collections
        .get(collection)
        .map(|items| {
            items
                .iter()
                .filter(|item| matches_filters(item, &query))
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    let total = matching.len();
    let items: Vec<Value> = matching
        .into_iter()
        .skip((page - 1) * limit)
        .take(limit)
        .collect();

    Json(json!({"items": items, "total": total})).into_response()
}

async fn get_item(ctx: Ctx, collection: &str, id: &str, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    let mut inner = ctx.lock();
    inner.record(&method, &uri, &headers);
    if !inner.is_admin(&headers) {
        return unauthorized();
    }
    inner
        .collections
        .get(collection)
        .and_then(|items| items.iter().find(|item| item["id"] == id))
        .map(|item| Json(item.clone()).into_response())
        .unwrap_or_else(|| not_found(collection))
}

async fn create_item(ctx: Ctx, collection: &str, extra: Map<String, Value>, req: Request) -> Response {
    let (method, uri, headers) = (req.method().clone(), req.uri().clone(), req.headers().clone());
    let body = match read_body(req).await {
        Ok(body) => body,
        Err(response) => return response,
    };

    let mut inner = ctx.lock();
    let index = inner.record(&method, &uri, &headers);
    inner.attach_body(index, &body);
    if !inner.is_admin(&headers) {
        return unauthorized();
    }

    let mut object = body.into_object();
    object.extend(extra);

    if collection == "users" {
        let email = object.get("email").cloned();
        let taken = inner
            .collections
            .get("users")
            .is_some_and(|users| users.iter().any(|u| Some(&u["email"]) == email.as_ref()));
        if taken {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"message": ["Email already exists"], "statusCode": 400})),
            )
                .into_response();
        }
        object.remove("password");
    }

    let id = inner.next_id(collection);
    object.insert("id".into(), Value::String(id));
    let created = Value::Object(object);
    inner
        .collections
        .entry(collection.to_string())
        .or_default()
        .push(created.clone());

    (StatusCode::CREATED, Json(created)).into_response()
}

async fn update_item(ctx: Ctx, collection: &str, id: &str, req: Request) -> Response {
    let (method, uri, headers) = (req.method().clone(), req.uri().clone(), req.headers().clone());
    let body = match read_body(req).await {
        Ok(body) => body,
        Err(response) => return response,
    };

    let mut inner = ctx.lock();
    let index = inner.record(&method, &uri, &headers);
    inner.attach_body(index, &body);
    if !inner.is_admin(&headers) {
        return unauthorized();
    }

    let changes = body.into_object();
    let Some(item) = inner
        .collections
        .get_mut(collection)
        .and_then(|items| items.iter_mut().find(|item| item["id"] == id))
    else {
        return not_found(collection);
    };
    if let Value::Object(map) = item {
        for (key, value) in changes {
            if key != "password" {
                map.insert(key, value);
            }
        }
    }
    Json(item.clone()).into_response()
}

async fn delete_item(ctx: Ctx, collection: &str, id: &str, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    let mut inner = ctx.lock();
    inner.record(&method, &uri, &headers);
    if !inner.is_admin(&headers) {
        return unauthorized();
    }
    let Some(items) = inner.collections.get_mut(collection) else {
        return not_found(collection);
    };
    let before = items.len();
    items.retain(|item| item["id"] != id);
    if items.len() == before {
        return not_found(collection);
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn list_collection(
    State(ctx): State<Ctx>,
    Path(collection): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    list_items(ctx, &collection, method, uri, headers, query).await
}

async fn create_in_collection(
    State(ctx): State<Ctx>,
    Path(collection): Path<String>,
    req: Request,
) -> Response {
    create_item(ctx, &collection, Map::new(), req).await
}

async fn get_in_collection(
    State(ctx): State<Ctx>,
    Path((collection, id)): Path<(String, String)>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    get_item(ctx, &collection, &id, method, uri, headers).await
}

async fn update_in_collection(
    State(ctx): State<Ctx>,
    Path((collection, id)): Path<(String, String)>,
    req: Request,
) -> Response {
    update_item(ctx, &collection, &id, req).await
}

async fn delete_in_collection(
    State(ctx): State<Ctx>,
    Path((collection, id)): Path<(String, String)>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    delete_item(ctx, &collection, &id, method, uri, headers).await
}

async fn list_categories(
    State(ctx): State<Ctx>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    list_items(ctx, "categories", method, uri, headers, query).await
}

async fn create_category(State(ctx): State<Ctx>, req: Request) -> Response {
    create_item(ctx, "categories", Map::new(), req).await
}

async fn get_category(
    State(ctx): State<Ctx>,
    Path(id): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    get_item(ctx, "categories", &id, method, uri, headers).await
}

async fn update_category(State(ctx): State<Ctx>, Path(id): Path<String>, req: Request) -> Response {
    update_item(ctx, "categories", &id, req).await
}

async fn delete_category(
    State(ctx): State<Ctx>,
    Path(id): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    delete_item(ctx, "categories", &id, method, uri, headers).await
}

async fn assign_doctor(State(ctx): State<Ctx>, Path(user_id): Path<String>, req: Request) -> Response {
    let known_user = ctx
        .lock()
        .collections
        .get("users")
        .is_some_and(|users| users.iter().any(|u| u["id"] == user_id.as_str()));
    if !known_user {
        return not_found("users");
    }

    let mut extra = Map::new();
    extra.insert("userId".into(), Value::String(user_id));
    create_item(ctx, "doctors", extra, req).await
}

fn router(ctx: Ctx) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/auth/logout", post(logout))
        .route(
            "/api/doctors/categories",
            get(list_categories).post(create_category),
        )
        .route(
            "/api/doctors/categories/{id}",
            get(get_category)
                .patch(update_category)
                .delete(delete_category),
        )
        .route("/api/doctors/users/{user_id}", post(assign_doctor))
        .route(
            "/api/{collection}",
            get(list_collection).post(create_in_collection),
        )
        .route(
            "/api/{collection}/{id}",
            get(get_in_collection)
                .patch(update_in_collection)
                .delete(delete_in_collection),
        )
        .with_state(ctx)
}

/// A running mock backend.
pub struct MockBackend {
    base_url: String,
    ctx: Ctx,
}

impl MockBackend {
    pub async fn start() -> Self {
        let ctx = Ctx::default();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(ctx.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api", addr),
            ctx,
        }
    }

    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Registers a login account and lists it in the users collection.
    pub fn add_account(&self, email: &str, password: &str, role: &str) -> Value {
        let mut inner = self.ctx.lock();
        let id = inner.next_id("users");
        let user = json!({
            "id": id,
            "name": Name().fake::<String>(),
            "email": email,
            "role": role,
        });
        inner.accounts.push(Account {
            email: email.to_string(),
            password: password.to_string(),
            user: user.clone(),
        });
        inner
            .collections
            .entry("users".to_string())
            .or_default()
            .push(user.clone());
        user
    }

    /// A valid access token for an existing account, as if it had logged in.
    pub fn token_for(&self, email: &str) -> String {
        let mut inner = self.ctx.lock();
        let user = inner
            .accounts
            .iter()
            .find(|a| a.email == email)
            .map(|a| a.user.clone())
            .unwrap();
        let token = format!("access-{}", Uuid::new_v4());
        inner.tokens.insert(token.clone(), user);
        token
    }

    /// Invalidates every issued token.
    pub fn revoke_tokens(&self) {
        self.ctx.lock().tokens.clear();
    }

    pub fn fail_logout(&self) {
        self.ctx.lock().fail_logout = true;
    }

    /// Delays responses for `page` of any collection.
    pub fn delay_page(&self, page: u32, delay: Duration) {
        self.ctx.lock().page_delays.insert(page, delay);
    }

    pub fn seed(&self, collection: &str, items: Vec<Value>) {
        self.ctx
            .lock()
            .collections
            .entry(collection.to_string())
            .or_default()
            .extend(items);
    }

    pub fn items(&self, collection: &str) -> Vec<Value> {
        self.ctx
            .lock()
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.ctx.lock().requests.clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn last_request_to(&self, method: &str, path: &str) -> Option<RecordedRequest> {
        self.requests_to(method, path).pop()
    }
}

/// Records every navigation.
#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

/// Client state pointed at `backend`, backed by `store`.
pub fn client_state(backend: &MockBackend, store: Arc<MemoryTokenStore>) -> AppState {
    let config = ApiConfig::default().with_base_url(backend.url());
    AppState::new(config, store).unwrap()
}

pub const ADMIN_EMAIL: &str = "admin@medadmin.test";
pub const ADMIN_PASSWORD: &str = "correct-horse";

/// Backend with one administrator, plus a client already signed in as them.
pub async fn signed_in() -> (MockBackend, AppState, Arc<MemoryTokenStore>) {
    let backend = MockBackend::start().await;
    backend.add_account(ADMIN_EMAIL, ADMIN_PASSWORD, "admin");
    let store = Arc::new(MemoryTokenStore::with_tokens(
        &backend.token_for(ADMIN_EMAIL),
        Some("refresh"),
    ));
    let state = client_state(&backend, store.clone());
    let guard = state.session_guard(Arc::new(RecordingNavigator::default()));
    assert!(guard.initialize().await.is_authenticated());
    (backend, state, store)
}

pub fn doctor_json(category_id: &str) -> Value {
    json!({
        "id": format!("doctor-{}", Uuid::new_v4()),
        "firstName": FirstName().fake::<String>(),
        "lastName": LastName().fake::<String>(),
        "categoryId": category_id,
        "specialization": "General Practice",
        "yearsExperience": (1u32..30).fake::<u32>(),
        "rating": 4.5,
        "reviewsCount": (0u32..500).fake::<u32>(),
        "bio": "",
        "languages": ["English"],
        "consultationFee": 50,
        "contactEmail": SafeEmail().fake::<String>(),
        "contactPhone": "+2348000000000",
        "clinicAddress": "1 Marina Road",
        "location": {"latitude": 6.45, "longitude": 3.39},
    })
}

pub fn doctors(count: usize) -> Vec<Value> {
    (0..count).map(|_| doctor_json("category-1")).collect()
}

pub fn category_json(name: &str) -> Value {
    json!({
        "id": format!("category-{}", Uuid::new_v4()),
        "name": name,
        "description": format!("{} specialists", name),
    })
}

pub fn pharmacy_json(city: &str) -> Value {
    json!({
        "id": format!("pharmacy-{}", Uuid::new_v4()),
        "name": CompanyName().fake::<String>(),
        "address": "12 Allen Avenue",
        "city": city,
        "contactPhone": "+2348011111111",
        "contactEmail": SafeEmail().fake::<String>(),
        "openingHours": "8:00-20:00",
        "is24h": false,
        "location": {"latitude": "6.60", "longitude": "3.35"},
    })
}

pub fn random_city() -> String {
    CityName().fake()
}

pub fn user_json(role: &str) -> Value {
    json!({
        "id": format!("user-{}", Uuid::new_v4()),
        "name": Name().fake::<String>(),
        "email": SafeEmail().fake::<String>(),
        "role": role,
        "createdAt": "2024-05-01T10:00:00Z",
    })
}
