use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Perfis de acesso do sistema, em ordem crescente de privilégio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Perfil {
    Arquiteto,
    ChefeDeNucleo,
    Gerente,
    Diretor,
}

impl Perfil {
    pub fn as_str(&self) -> &'static str {
        match self {
            Perfil::Arquiteto => "ARQUITETO",
            Perfil::ChefeDeNucleo => "CHEFE_DE_NUCLEO",
            Perfil::Gerente => "GERENTE",
            Perfil::Diretor => "DIRETOR",
        }
    }
}

impl fmt::Display for Perfil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Perfil {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ARQUITETO" => Ok(Perfil::Arquiteto),
            "CHEFE_DE_NUCLEO" => Ok(Perfil::ChefeDeNucleo),
            "GERENTE" => Ok(Perfil::Gerente),
            "DIRETOR" => Ok(Perfil::Diretor),
            other => Err(format!("perfil desconhecido: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    pub hash_senha: String,
    pub perfil: Perfil,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
}

/// Projeção de `Usuario` sem o hash de senha, para respostas da API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioPublico {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    pub perfil: Perfil,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Usuario> for UsuarioPublico {
    fn from(u: Usuario) -> Self {
        UsuarioPublico {
            id: u.id,
            nome: u.nome,
            email: u.email,
            perfil: u.perfil,
            ativo: u.ativo,
            created_at: u.created_at,
        }
    }
}
