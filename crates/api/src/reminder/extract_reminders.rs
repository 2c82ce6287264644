use crate::error::MealmindError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use mealmind_api_structs::extract_reminders::*;
use mealmind_domain::{deduplicate_activities, ActivityExtractor, Reminder, ID};
use mealmind_infra::MealmindContext;

fn handle_error(e: UseCaseError) -> MealmindError {
    match e {
        UseCaseError::StorageError => MealmindError::InternalError,
    }
}

pub async fn extract_reminders_controller(
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<MealmindContext>,
) -> Result<HttpResponse, MealmindError> {
    let body = body.into_inner();
    let usecase = ExtractRemindersUseCase {
        user_id: path.user_id.clone(),
        text: body.text,
        document_ref: body.document_ref,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(handle_error)
}

/// Turns raw diet text into persisted reminders: scan for timed
/// activities, collapse duplicates, build one reminder per survivor.
///
/// Text that yields nothing is an ordinary empty result. The ids are
/// stable hashes, so extracting the same diet again overwrites rather
/// than duplicates.
#[derive(Debug)]
pub struct ExtractRemindersUseCase {
    pub user_id: ID,
    pub text: Option<String>,
    pub document_ref: Option<String>,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for ExtractRemindersUseCase {
    type Response = Vec<Reminder>;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &MealmindContext) -> Result<Self::Response, Self::Errors> {
        let text = match (self.text.take(), self.document_ref.take()) {
            (Some(text), _) => text,
            (None, Some(document_ref)) => {
                match ctx
                    .text_extractor
                    .extract_text(&document_ref)
                    .await
                    .map_err(|_| UseCaseError::StorageError)?
                {
                    Some(text) => text,
                    // Document without extractable text: zero reminders
                    None => return Ok(Vec::new()),
                }
            }
            (None, None) => return Ok(Vec::new()),
        };

        let now = ctx.sys.get_timestamp_millis();
        let extractor = ActivityExtractor::new();
        let activities = deduplicate_activities(extractor.scan(&text).collect());
        let reminders = activities
            .iter()
            .filter_map(|a| Reminder::from_activity(self.user_id.clone(), a, now))
            .collect::<Vec<_>>();

        ctx.repos
            .reminders
            .bulk_upsert(&reminders)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(reminders)
    }
}
