use super::repository::Repository;
use crate::models::Entity;
use service_core::error::AppError;
use service_core::outcome::Notifier;
use service_core::validation::Validator;
use std::marker::PhantomData;
use std::sync::Arc;

/// Validate-then-persist for one entity type.
///
/// Rule violations go to the caller's notifier and skip persistence; the
/// call still returns `Ok`. Repository failures are returned as errors.
pub struct EntityService<E, R: ?Sized> {
    repository: Arc<R>,
    validator: Arc<dyn Validator<E>>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, R: ?Sized> Clone for EntityService<E, R> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            validator: self.validator.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E, R> EntityService<E, R>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    pub fn new(repository: Arc<R>, validator: impl Validator<E> + 'static) -> Self {
        Self {
            repository,
            validator: Arc::new(validator),
            _entity: PhantomData,
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Run the rule set, forwarding every violation. Returns whether it passed.
    pub fn validate(&self, notifier: &mut Notifier, entity: &E) -> bool {
        let result = self.validator.validate(entity);
        if result.is_valid() {
            return true;
        }
        tracing::info!(
            kind = E::KIND,
            id = %entity.id(),
            violations = result.violations().len(),
            "Entity failed business validation"
        );
        result.notify(notifier);
        false
    }

    pub async fn add(&self, notifier: &mut Notifier, entity: &E) -> Result<(), AppError> {
        if !self.validate(notifier, entity) {
            return Ok(());
        }
        self.repository.add(entity).await?;
        tracing::info!(kind = E::KIND, id = %entity.id(), "Entity added");
        Ok(())
    }

    pub async fn update(&self, notifier: &mut Notifier, entity: &E) -> Result<(), AppError> {
        if !self.validate(notifier, entity) {
            return Ok(());
        }
        self.repository.update(entity).await?;
        tracing::info!(kind = E::KIND, id = %entity.id(), "Entity updated");
        Ok(())
    }

    /// No validation and no existence check.
    pub async fn remove(&self, id: &str) -> Result<(), AppError> {
        self.repository.remove(id).await?;
        tracing::info!(kind = E::KIND, id = %id, "Entity removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;
    use crate::rules::product_rules;
    use crate::services::memory::InMemoryRepository;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls and fails every write.
    #[derive(Default)]
    struct FailingRepository {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Repository<Product> for FailingRepository {
        async fn add(&self, _: &Product) -> Result<(), AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(AppError::DatabaseError(anyhow::anyhow!("connection reset")))
        }
        async fn update(&self, _: &Product) -> Result<(), AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(AppError::DatabaseError(anyhow::anyhow!("connection reset")))
        }
        async fn remove(&self, _: &str) -> Result<(), AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        async fn get_by_id(&self, _: &str) -> Result<Option<Product>, AppError> {
            Ok(None)
        }
        async fn get_all(&self) -> Result<Vec<Product>, AppError> {
            Ok(Vec::new())
        }
    }

    fn product(price: f64) -> Product {
        Product {
            id: "p-1".into(),
            supplier_id: "s-1".into(),
            name: "Widget".into(),
            description: "A widget".into(),
            image: "img.png".into(),
            price,
            active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn invalid_entity_is_never_persisted() {
        let repo = Arc::new(FailingRepository::default());
        let service = EntityService::new(repo.clone(), product_rules());
        let mut notifier = Notifier::new();

        service.add(&mut notifier, &product(0.0)).await.unwrap();
        service.update(&mut notifier, &product(-3.0)).await.unwrap();

        assert_eq!(repo.calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            notifier.messages(),
            vec![
                "The price field must be greater than 0",
                "The price field must be greater than 0"
            ]
        );
    }

    #[tokio::test]
    async fn valid_entity_is_persisted() {
        let repo = Arc::new(InMemoryRepository::<Product>::new());
        let service = EntityService::new(repo.clone(), product_rules());
        let mut notifier = Notifier::new();

        service.add(&mut notifier, &product(10.0)).await.unwrap();

        assert!(!notifier.has_notifications());
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn persistence_failure_is_fatal_not_a_notification() {
        let repo = Arc::new(FailingRepository::default());
        let service = EntityService::new(repo, product_rules());
        let mut notifier = Notifier::new();

        let err = service.add(&mut notifier, &product(10.0)).await.unwrap_err();

        assert!(matches!(err, AppError::DatabaseError(_)));
        assert!(!notifier.has_notifications());
    }

    #[tokio::test]
    async fn remove_twice_never_validates() {
        let repo = Arc::new(FailingRepository::default());
        let service = EntityService::new(repo.clone(), product_rules());

        service.remove("missing").await.unwrap();
        service.remove("missing").await.unwrap();

        assert_eq!(repo.calls.load(Ordering::SeqCst), 2);
    }
}
