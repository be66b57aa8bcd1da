use crate::config::{CatalogConfig, PersistenceBackend};
use crate::handlers::{self, products, suppliers};
use crate::models::{Product, Supplier};
use crate::policy::access_policy;
use crate::services::{
    ImageStore, InMemoryRepository, LocalStorage, MongoDb, MongoRepository, ProductRepository,
    ProductService, Storage, SupplierRepository, SupplierService,
};
use axum::{
    body::Body,
    http::{header, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use secrecy::ExposeSecret;
use service_core::auth::{authenticate, authorize, AccessPolicy, JwtService};
use service_core::error::AppError;
use service_core::middleware::{
    make_request_span, metrics_middleware, request_id_middleware, security_headers_middleware,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

#[derive(Clone)]
pub struct AppState {
    pub config: CatalogConfig,
    pub db: Option<MongoDb>,
    pub suppliers: SupplierService,
    pub products: ProductService,
    pub jwt: Arc<JwtService>,
    pub policy: Arc<AccessPolicy>,
}

impl AsRef<JwtService> for AppState {
    fn as_ref(&self) -> &JwtService {
        &self.jwt
    }
}

impl AsRef<AccessPolicy> for AppState {
    fn as_ref(&self) -> &AccessPolicy {
        &self.policy
    }
}

impl AppState {
    /// Wire repositories, storage and token verification from `config`.
    pub async fn from_config(config: CatalogConfig) -> Result<Self, AppError> {
        let (db, supplier_repository, product_repository): (
            Option<MongoDb>,
            Arc<dyn SupplierRepository>,
            Arc<dyn ProductRepository>,
        ) = match config.persistence {
            PersistenceBackend::Memory => {
                tracing::info!("Using in-memory persistence");
                (
                    None,
                    Arc::new(InMemoryRepository::<Supplier>::new()),
                    Arc::new(InMemoryRepository::<Product>::new()),
                )
            }
            PersistenceBackend::MongoDb => {
                let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database)
                    .await
                    .map_err(|e| {
                        tracing::error!("Failed to connect to MongoDB: {}", e);
                        e
                    })?;
                db.initialize_indexes().await.map_err(|e| {
                    tracing::error!("Failed to initialize database indexes: {}", e);
                    e
                })?;
                (
                    Some(db.clone()),
                    Arc::new(MongoRepository::new(db.suppliers())),
                    Arc::new(MongoRepository::new(db.products())),
                )
            }
        };

        let storage: Arc<dyn Storage> = Arc::new(
            LocalStorage::new(&config.storage.local_path)
                .await
                .map_err(|e| {
                    tracing::error!(
                        "Failed to initialize local storage at {}: {}",
                        config.storage.local_path,
                        e
                    );
                    e
                })?,
        );
        let images = ImageStore::new(storage);

        let jwt = JwtService::new(
            config.jwt.secret.expose_secret(),
            &config.jwt.issuer,
            &config.jwt.audience,
            config.jwt.expiry_hours,
        );

        Ok(AppState {
            suppliers: SupplierService::new(
                supplier_repository.clone(),
                product_repository.clone(),
                images.clone(),
            ),
            products: ProductService::new(product_repository, supplier_repository, images),
            jwt: Arc::new(jwt),
            policy: Arc::new(access_policy()),
            db,
            config,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    // Layers run bottom-up: authenticate, then the gate.
    let api = Router::new()
        .route(
            "/api/suppliers",
            get(suppliers::list_suppliers).post(suppliers::create_supplier),
        )
        .route(
            "/api/suppliers/:id",
            get(suppliers::get_supplier)
                .put(suppliers::update_supplier)
                .delete(suppliers::delete_supplier),
        )
        .route(
            "/api/suppliers/address/:id",
            get(suppliers::get_address).put(suppliers::update_address),
        )
        .route(
            "/api/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/api/products/upload", post(products::upload_product))
        .route(
            "/api/products/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route_layer(from_fn_with_state(state.clone(), authorize::<AppState>))
        .route_layer(from_fn_with_state(state.clone(), authenticate::<AppState>));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .merge(api)
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        )
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    state: AppState,
}

impl Application {
    pub async fn build(config: CatalogConfig) -> Result<Self, AppError> {
        let host = config.common.host.clone();
        let port = config.common.port;
        let state = AppState::from_config(config).await?;
        let router = build_router(state.clone());

        let listener = TcpListener::bind((host.as_str(), port)).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}:{}: {}", host, port, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port = port, "Listening");

        Ok(Self {
            port,
            listener,
            router,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }

    /// Serve until `signal` resolves, then drain in-flight requests.
    pub async fn run_with_graceful_shutdown<F>(self, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .await
    }
}
