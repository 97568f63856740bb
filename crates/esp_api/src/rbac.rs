//! Tabela estática de permissões por ação e a checagem de perfil.

use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use esp_core::models::Perfil;

use crate::error::Rejeicao;

pub mod permissoes {
    use esp_core::models::Perfil;
    use Perfil::{Arquiteto, ChefeDeNucleo, Diretor, Gerente};

    pub const CRIAR_ESP: &[Perfil] = &[Arquiteto, ChefeDeNucleo, Gerente, Diretor];
    pub const EDITAR_ESP: &[Perfil] = &[Arquiteto, ChefeDeNucleo, Gerente, Diretor];
    pub const DELETAR_ESP: &[Perfil] = &[Gerente, Diretor];

    pub const CRIAR_CADERNO: &[Perfil] = &[Arquiteto, ChefeDeNucleo, Gerente, Diretor];
    pub const EDITAR_CADERNO: &[Perfil] = &[Arquiteto, ChefeDeNucleo, Gerente, Diretor];
    pub const DELETAR_CADERNO: &[Perfil] = &[Gerente, Diretor];
    pub const MUDAR_STATUS_CADERNO: &[Perfil] = &[Gerente, Diretor];

    pub const CRIAR_ITEM_CATALOGO: &[Perfil] = &[Arquiteto, ChefeDeNucleo, Gerente, Diretor];

    pub const EXPORTAR_PDF: &[Perfil] = &[Arquiteto, ChefeDeNucleo, Gerente, Diretor];
    pub const EXPORTAR_DOCX: &[Perfil] = &[Diretor];

    pub const VER_LOGS: &[Perfil] = &[ChefeDeNucleo, Gerente, Diretor];
}

/// Checagem de acesso de um handler. `Err` já é a resposta 403 pronta.
pub fn exigir_perfil(perfil: Perfil, permitidos: &[Perfil]) -> Result<(), Rejeicao> {
    if permitidos.contains(&perfil) {
        return Ok(());
    }
    let exigidos = permitidos
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(" ou ");
    Err((
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "Acesso negado",
            "message": format!("Requer perfil: {}", exigidos),
        })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diretor_pode_exportar_docx_arquiteto_nao() {
        assert!(exigir_perfil(Perfil::Diretor, permissoes::EXPORTAR_DOCX).is_ok());
        assert!(exigir_perfil(Perfil::Arquiteto, permissoes::EXPORTAR_DOCX).is_err());
    }

    #[test]
    fn todos_os_perfis_exportam_pdf() {
        for perfil in [
            Perfil::Arquiteto,
            Perfil::ChefeDeNucleo,
            Perfil::Gerente,
            Perfil::Diretor,
        ] {
            assert!(exigir_perfil(perfil, permissoes::EXPORTAR_PDF).is_ok());
        }
    }

    #[test]
    fn recusa_carrega_os_perfis_exigidos() {
        let erro = exigir_perfil(Perfil::Arquiteto, permissoes::DELETAR_ESP).unwrap_err();
        assert_eq!(erro.0, StatusCode::FORBIDDEN);
        let corpo = erro.1 .0;
        assert_eq!(corpo["message"], "Requer perfil: GERENTE ou DIRETOR");
    }
}
