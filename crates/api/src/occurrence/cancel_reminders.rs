use crate::error::MealmindError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use mealmind_api_structs::cancel_reminders::*;
use mealmind_domain::ID;
use mealmind_infra::MealmindContext;

fn handle_error(e: UseCaseError) -> MealmindError {
    match e {
        UseCaseError::StorageError => MealmindError::InternalError,
    }
}

pub async fn cancel_reminders_controller(
    path: web::Path<PathParams>,
    ctx: web::Data<MealmindContext>,
) -> Result<HttpResponse, MealmindError> {
    let usecase = CancelRemindersUseCase {
        user_id: path.user_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|count| HttpResponse::Ok().json(APIResponse::new(count)))
        .map_err(handle_error)
}

/// Cancels every pending occurrence for one user. Reminders themselves are
/// untouched, a later scheduling pass can bring them back. Running this
/// twice is a no-op the second time.
#[derive(Debug)]
pub struct CancelRemindersUseCase {
    pub user_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CancelRemindersUseCase {
    type Response = usize;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &MealmindContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.get_timestamp_millis();
        let scheduled = ctx
            .repos
            .occurrences
            .find_scheduled_by_user(&self.user_id)
            .await;

        let mut cancelled = 0;
        for mut occurrence in scheduled {
            occurrence.mark_cancelled(now);
            ctx.repos
                .occurrences
                .save(&occurrence)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
            cancelled += 1;
        }

        Ok(cancelled)
    }
}
