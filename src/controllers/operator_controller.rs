//! Controller de operadores
//!
//! CRUD de operadores. Su estado es administrativo y se edita directo;
//! la ocupación por fechas la resuelve el validador de disponibilidad.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::operator_dto::{CreateOperatorRequest, OperatorResponse, UpdateOperatorRequest};
use crate::models::resource::OperatorStatus;
use crate::repositories::operator_repository::OperatorRepository;
use crate::utils::errors::{AppError, AppResult};

pub struct OperatorController {
    repository: OperatorRepository,
}

impl OperatorController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: OperatorRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        request: CreateOperatorRequest,
    ) -> AppResult<ApiResponse<OperatorResponse>> {
        request.validate()?;

        let operator = self
            .repository
            .create(company_id, request.full_name, request.license_number)
            .await?;

        Ok(ApiResponse::success_with_message(
            operator.into(),
            "Operador creado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid, company_id: Uuid) -> AppResult<OperatorResponse> {
        let operator = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Operador no encontrado".to_string()))?;

        if operator.company_id != company_id {
            return Err(AppError::Forbidden(
                "No tienes permiso para acceder a este operador".to_string(),
            ));
        }

        Ok(operator.into())
    }

    pub async fn list_by_company(&self, company_id: Uuid) -> AppResult<Vec<OperatorResponse>> {
        let operators = self.repository.find_by_company(company_id).await?;
        Ok(operators.into_iter().map(OperatorResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        company_id: Uuid,
        request: UpdateOperatorRequest,
    ) -> AppResult<ApiResponse<OperatorResponse>> {
        request.validate()?;

        let operator = self
            .repository
            .update(id, company_id, request.full_name, request.license_number)
            .await?;

        Ok(ApiResponse::success_with_message(
            operator.into(),
            "Operador actualizado exitosamente".to_string(),
        ))
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        company_id: Uuid,
        status: OperatorStatus,
    ) -> AppResult<ApiResponse<OperatorResponse>> {
        let operator = self.repository.update_status(id, company_id, status).await?;

        Ok(ApiResponse::success_with_message(
            operator.into(),
            "Estado del operador actualizado".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid, company_id: Uuid) -> AppResult<()> {
        self.repository.delete(id, company_id).await
    }
}
