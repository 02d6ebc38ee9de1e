use crate::helpers::JsonResponse;
use crate::models::HomelabDataset;
use crate::views::homelab::{Homelab, HomelabIndex};
use actix_web::{get, web, Responder, Result};

/// GET /homelabs
/// Names of the known homelabs and the metrics they report.
#[tracing::instrument(name = "List homelabs.", skip(dataset))]
#[get("")]
pub async fn list(dataset: web::Data<HomelabDataset>) -> impl Responder {
    JsonResponse::build()
        .set_item(HomelabIndex::from(dataset.get_ref()))
        .ok("OK")
}

/// GET /homelabs/{name}
#[tracing::instrument(name = "Get homelab.", skip(dataset))]
#[get("/{name}")]
pub async fn item(
    path: web::Path<(String,)>,
    dataset: web::Data<HomelabDataset>,
) -> Result<impl Responder> {
    let name = path.into_inner().0;
    dataset
        .get(&name)
        .map(|record| JsonResponse::build().set_item(Homelab::new(&name, record)).ok("OK"))
        .ok_or_else(|| JsonResponse::<Homelab>::build().not_found("Homelab not found"))
}
