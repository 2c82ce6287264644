use crate::shared::usecase::UseCase;
use mealmind_infra::MealmindContext;

/// Deletes sent, failed and cancelled occurrences older than the retention
/// window. Pending rows are never touched, however old they are.
#[derive(Debug)]
pub struct PurgeOldOccurrencesUseCase;

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for PurgeOldOccurrencesUseCase {
    type Response = i64;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &MealmindContext) -> Result<Self::Response, Self::Errors> {
        let before = ctx.sys.get_timestamp_millis() - ctx.config.occurrence_retention_millis();
        let res = ctx
            .repos
            .occurrences
            .delete_terminal_before(before)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        Ok(res.deleted_count)
    }
}
