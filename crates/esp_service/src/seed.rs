//! Carga inicial idempotente: um usuário por perfil e o catálogo
//! completo de itens de referência.

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::info;
use uuid::Uuid;

use esp_core::models::{Categoria, ItemCatalogo, NovoLog, Perfil, Usuario};
use esp_db::Storage;

use crate::error::Result;

/// Digest da senha de carga. A autenticação real fica fora deste sistema;
/// o campo existe para manter o formato do registro.
fn hash_senha(senha: &str) -> String {
    hex::encode(Sha256::digest(senha.as_bytes()))
}

pub async fn seed_database(store: &dyn Storage) -> Result<()> {
    info!("Starting database seed...");

    let usuarios = [
        ("João Arquiteto", "arquiteto@seedf.df.gov.br", "Arquiteto123!", Perfil::Arquiteto),
        ("Maria Chefe", "chefe@seedf.df.gov.br", "Chefe123!", Perfil::ChefeDeNucleo),
        ("Pedro Gerente", "gerente@seedf.df.gov.br", "Gerente123!", Perfil::Gerente),
        ("Ana Diretora", "diretor@seedf.df.gov.br", "Diretor123!", Perfil::Diretor),
    ];

    let mut primeiro_usuario: Option<Uuid> = None;
    for (nome, email, senha, perfil) in usuarios {
        let existente = store.get_usuario_por_email(email).await?;
        let id = match existente {
            Some(usuario) => {
                info!(email, "User already exists");
                usuario.id
            }
            None => {
                let usuario = store
                    .create_usuario(Usuario {
                        id: Uuid::new_v4(),
                        nome: nome.to_string(),
                        email: email.to_string(),
                        hash_senha: hash_senha(senha),
                        perfil,
                        ativo: true,
                        created_at: Utc::now(),
                    })
                    .await?;
                info!(email, "User created");
                usuario.id
            }
        };
        primeiro_usuario.get_or_insert(id);
    }

    let constituintes = [
        "Argamassa de cimento e areia",
        "Blocos cerâmicos",
        "Blocos de concreto",
        "Concreto estrutural",
        "Aço CA-50",
        "Aço CA-60",
        "Tinta látex acrílica",
        "Tinta epóxi",
    ];
    for nome in constituintes {
        seed_item(store, Categoria::Constituinte, nome, None, None).await?;
    }

    let acessorios = [
        "Parafusos 3/8\"",
        "Pregos 18x27",
        "Buchas S8",
        "Dobradiças 3\" cromadas",
        "Fechadura com chave",
        "Puxadores em alumínio",
    ];
    for nome in acessorios {
        seed_item(store, Categoria::Acessorio, nome, None, None).await?;
    }

    let acabamentos = [
        "Pintura lisa",
        "Pintura texturizada",
        "Revestimento cerâmico",
        "Porcelanato",
        "Gesso liso",
        "Forro de PVC",
    ];
    for nome in acabamentos {
        seed_item(store, Categoria::Acabamento, nome, None, None).await?;
    }

    let prototipos = [
        ("Cano PVC 20mm", "Tigre"),
        ("Cano PVC 20mm", "Gravia"),
        ("Cano PVC 25mm", "Tigre"),
        ("Barra de ferro 20x30mm", "Gerdau"),
        ("Barra de ferro 20x30mm", "Belgo"),
        ("Tinta látex 18L", "Suvinil"),
        ("Tinta látex 18L", "Coral"),
        ("Cimento 50kg", "Votorantim"),
    ];
    for (nome, marca) in prototipos {
        seed_item(store, Categoria::PrototipoComercial, nome, Some(marca), None).await?;
    }

    let aplicacoes = [
        "Infraestrutura",
        "Acabamento",
        "Elétrica",
        "Hidráulica",
        "Estrutural",
        "Revestimento",
    ];
    for nome in aplicacoes {
        seed_item(store, Categoria::Aplicacao, nome, None, None).await?;
    }

    let fichas_recebimento = [
        (
            "Ficha de Recebimento de Materiais Hidráulicos",
            "Verificação de conformidade de materiais hidráulicos",
        ),
        (
            "Ficha de Conferência Elétrica",
            "Inspeção de materiais e instalações elétricas",
        ),
        (
            "Ficha de Recebimento de Estruturas Metálicas",
            "Controle de qualidade de estruturas metálicas",
        ),
        (
            "Ficha de Inspeção de Alvenaria",
            "Verificação de blocos e execução de alvenaria",
        ),
        (
            "Ficha de Recebimento de Revestimentos",
            "Controle de materiais de revestimento cerâmico e porcelanato",
        ),
        (
            "Ficha de Conferência de Pintura",
            "Inspeção de tintas e execução de pintura",
        ),
        (
            "Ficha de Recebimento de Materiais Estruturais",
            "Verificação de concreto, aço e outros materiais estruturais",
        ),
    ];
    for (nome, descricao) in fichas_recebimento {
        seed_item(store, Categoria::FichaRecebimento, nome, None, Some(descricao)).await?;
    }

    let servicos = [
        ("Instalação do Componente", "Serviço de instalação de componente técnico"),
        ("Montagem do Equipamento", "Montagem completa de equipamentos"),
        ("Ajuste e Nivelamento", "Ajuste fino e nivelamento de estruturas"),
        ("Limpeza Pós-Instalação", "Limpeza do local após instalação"),
        ("Apiloamento do terreno", "Preparação e compactação do terreno"),
        ("Base de concreto simples", "Execução de base em concreto simples"),
        ("Piso com Revestimento", "Execução de piso com revestimento"),
        ("Cobertura", "Execução de cobertura"),
        (
            "Alvenaria com revestimentos (interno e externo)",
            "Execução de alvenaria com revestimentos interno e externo",
        ),
        ("Ralo e torneiras", "Instalação de ralos e torneiras"),
        ("Lubrificação de partes móveis", "Serviço de lubrificação de partes móveis"),
    ];
    for (nome, descricao) in servicos {
        seed_item(store, Categoria::ServicoIncluido, nome, None, Some(descricao)).await?;
    }

    if let Some(user_id) = primeiro_usuario {
        store
            .create_log(NovoLog::new(
                user_id,
                "SEED_DATABASE",
                "SYSTEM",
                "Banco de dados populado com dados iniciais",
            ))
            .await?;
    }

    info!("Database seed completed (users/catalog only)");
    Ok(())
}

async fn seed_item(
    store: &dyn Storage,
    categoria: Categoria,
    nome: &str,
    marca: Option<&str>,
    descricao: Option<&str>,
) -> Result<()> {
    if store.get_item_por_nome(categoria, nome, marca).await?.is_some() {
        return Ok(());
    }
    store
        .create_item(ItemCatalogo {
            id: Uuid::new_v4(),
            categoria,
            nome: nome.to_string(),
            marca: marca.map(str::to_string),
            descricao: descricao.map(str::to_string),
            ativo: true,
            created_at: Utc::now(),
        })
        .await?;
    info!(categoria = categoria.as_str(), nome, "Catalog item created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use esp_db::MemStorage;

    #[tokio::test]
    async fn seed_e_idempotente() {
        let store = MemStorage::new();
        seed_database(&store).await.unwrap();
        let antes = store.list_itens_ativos().await.unwrap().len();

        seed_database(&store).await.unwrap();
        let depois = store.list_itens_ativos().await.unwrap().len();
        assert_eq!(antes, depois);

        let diretor = store
            .get_usuario_por_email("diretor@seedf.df.gov.br")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(diretor.perfil, Perfil::Diretor);
    }

    #[tokio::test]
    async fn seed_cobre_todas_as_categorias_com_itens() {
        let store = MemStorage::new();
        seed_database(&store).await.unwrap();
        for categoria in [
            Categoria::Constituinte,
            Categoria::Acessorio,
            Categoria::Acabamento,
            Categoria::PrototipoComercial,
            Categoria::Aplicacao,
            Categoria::FichaRecebimento,
            Categoria::ServicoIncluido,
        ] {
            let itens = store.list_itens_por_categoria(categoria).await.unwrap();
            assert!(!itens.is_empty(), "categoria sem itens: {}", categoria);
        }
    }
}
