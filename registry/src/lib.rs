use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::repository::auth::AuthRepositoryImpl;
use adapter::repository::fuel_log::FuelLogRepositoryImpl;
use adapter::repository::health::HealthCheckRepositoryImpl;
use adapter::repository::reservation::ReservationRepositoryImpl;
use adapter::repository::rule::RuleRepositoryImpl;
use adapter::repository::user::UserRepositoryImpl;
use kernel::broadcast::BroadcastHub;
use kernel::repository::auth::AuthRepository;
use kernel::repository::fuel_log::FuelLogRepository;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::reservation::ReservationRepository;
use kernel::repository::rule::RuleRepository;
use kernel::repository::user::UserRepository;
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    reservation_repository: Arc<dyn ReservationRepository>,
    rule_repository: Arc<dyn RuleRepository>,
    user_repository: Arc<dyn UserRepository>,
    fuel_log_repository: Arc<dyn FuelLogRepository>,
    auth_repository: Arc<dyn AuthRepository>,
    broadcast_hub: Arc<BroadcastHub>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool, app_config: AppConfig) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let reservation_repository = Arc::new(ReservationRepositoryImpl::new(pool.clone()));
        let rule_repository = Arc::new(RuleRepositoryImpl::new(pool.clone()));
        let user_repository = Arc::new(UserRepositoryImpl::new(pool.clone()));
        let fuel_log_repository = Arc::new(FuelLogRepositoryImpl::new(pool.clone()));
        let auth_repository = Arc::new(AuthRepositoryImpl::new(pool, app_config.auth.ttl));
        // 接続レジストリはプロセスで一つだけ生成し、参照で引き回す
        let broadcast_hub = Arc::new(BroadcastHub::new());
        Self {
            health_check_repository,
            reservation_repository,
            rule_repository,
            user_repository,
            fuel_log_repository,
            auth_repository,
            broadcast_hub,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn reservation_repository(&self) -> Arc<dyn ReservationRepository> {
        self.reservation_repository.clone()
    }

    pub fn rule_repository(&self) -> Arc<dyn RuleRepository> {
        self.rule_repository.clone()
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn fuel_log_repository(&self) -> Arc<dyn FuelLogRepository> {
        self.fuel_log_repository.clone()
    }

    pub fn auth_repository(&self) -> Arc<dyn AuthRepository> {
        self.auth_repository.clone()
    }

    pub fn broadcast_hub(&self) -> Arc<BroadcastHub> {
        self.broadcast_hub.clone()
    }
}
