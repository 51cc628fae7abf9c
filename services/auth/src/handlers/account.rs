use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::Address;
use crate::error::AuthServiceError;
use crate::handlers::JsonBody;
use crate::handlers::validate::{optional, required};
use crate::state::AppState;
use crate::usecase::register::{RegisterInput, RegisterUseCase};

// ── POST /auth/cadastro ──────────────────────────────────────────────────────

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct AddressRequest {
    pub logradouro: String,
    pub numero: String,
    pub complemento: Option<String>,
    pub bairro: String,
    pub cidade: String,
    pub estado: String,
    pub cep: String,
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub nome: String,
    pub nome_usuario: String,
    pub email: String,
    pub senha: String,
    pub telefone: Option<String>,
    pub endereco: AddressRequest,
}

impl RegisterRequest {
    /// Presence and length only; content is accepted as sent.
    fn validate(&self) -> Result<(), AuthServiceError> {
        required("nome", &self.nome, 100)?;
        required("nomeUsuario", &self.nome_usuario, 100)?;
        required("email", &self.email, 100)?;
        required("senha", &self.senha, 100)?;
        optional("telefone", self.telefone.as_deref(), 20)?;

        let address = &self.endereco;
        required("endereco.logradouro", &address.logradouro, 100)?;
        required("endereco.numero", &address.numero, 100)?;
        optional("endereco.complemento", address.complemento.as_deref(), 100)?;
        required("endereco.bairro", &address.bairro, 100)?;
        required("endereco.cidade", &address.cidade, 100)?;
        required("endereco.estado", &address.estado, 2)?;
        required("endereco.cep", &address.cep, 9)?;
        Ok(())
    }
}

impl From<AddressRequest> for Address {
    fn from(req: AddressRequest) -> Self {
        Self {
            street: req.logradouro,
            number: req.numero,
            complement: req.complemento,
            district: req.bairro,
            city: req.cidade,
            state: req.estado,
            postal_code: req.cep,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub message: &'static str,
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AuthServiceError> {
    body.validate()?;

    let usecase = RegisterUseCase {
        users: state.user_repo(),
        hasher: state.hasher.clone(),
    };
    let account = usecase
        .execute(RegisterInput {
            name: body.nome,
            username: body.nome_usuario,
            email: body.email,
            password: body.senha,
            phone: body.telefone,
            address: body.endereco.into(),
        })
        .await?;

    Ok(Json(RegisterResponse {
        id: account.id,
        message: "Cadastro realizado com sucesso.",
    }))
}
