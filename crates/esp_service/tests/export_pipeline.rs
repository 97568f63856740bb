use std::io::Read;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use esp_core::models::{
    ArquivoMidia, Caderno, Categoria, ConteudoSecoes, DonoArquivo, Esp, ItemCatalogo, Perfil,
    Ponteiro, Selo, StatusCaderno, TipoArquivo, Usuario,
};
use esp_db::{BlobStore, MemBlobStore, MemStorage, Storage};
use esp_service::arquivos::NovoUpload;
use esp_service::{EspService, ServiceError};

fn servico() -> (EspService, Arc<MemStorage>, Arc<MemBlobStore>) {
    let store = Arc::new(MemStorage::new());
    let blobs = Arc::new(MemBlobStore::new());
    let service = EspService::new(store.clone(), blobs.clone(), "esp_files".to_string());
    (service, store, blobs)
}

async fn cria_usuario(store: &MemStorage, perfil: Perfil) -> Usuario {
    store
        .create_usuario(Usuario {
            id: Uuid::new_v4(),
            nome: "João Arquiteto".to_string(),
            email: format!("{}@seedf.df.gov.br", Uuid::new_v4()),
            hash_senha: "hash".to_string(),
            perfil,
            ativo: true,
            created_at: Utc::now(),
        })
        .await
        .unwrap()
}

async fn cria_item(store: &MemStorage, categoria: Categoria, nome: &str) -> ItemCatalogo {
    store
        .create_item(ItemCatalogo {
            id: Uuid::new_v4(),
            categoria,
            nome: nome.to_string(),
            marca: None,
            descricao: None,
            ativo: true,
            created_at: Utc::now(),
        })
        .await
        .unwrap()
}

fn esp_basica(autor_id: Uuid, secoes: ConteudoSecoes) -> Esp {
    let agora = Utc::now();
    Esp {
        id: Uuid::new_v4(),
        codigo: "ESP-001".to_string(),
        titulo: "Piso Cerâmico".to_string(),
        tipologia: "Revestimento".to_string(),
        revisao: "R01".to_string(),
        data_publicacao: agora,
        autor_id,
        selo: Selo::Nenhum,
        visivel: true,
        cadernos_ids: vec![],
        secoes,
        created_at: agora,
        updated_at: agora,
    }
}

fn caderno_basico(autor_id: Uuid, titulo: &str, secoes: ConteudoSecoes) -> Caderno {
    let agora = Utc::now();
    Caderno {
        id: Uuid::new_v4(),
        titulo: titulo.to_string(),
        descricao: None,
        status: StatusCaderno::Aprovado,
        autor_id,
        secoes,
        created_at: agora,
        updated_at: agora,
    }
}

fn texto_do_pdf(bytes: &[u8]) -> String {
    let doc = lopdf::Document::load_mem(bytes).unwrap();
    let paginas: Vec<u32> = doc.get_pages().keys().copied().collect();
    doc.extract_text(&paginas).unwrap()
}

fn xml_do_docx(bytes: &[u8]) -> String {
    let cursor = std::io::Cursor::new(bytes.to_vec());
    let mut zip = zip::ZipArchive::new(cursor).unwrap();
    let mut xml = String::new();
    zip.by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    xml
}

#[tokio::test]
async fn exportacao_pdf_ponta_a_ponta() {
    let (service, store, _) = servico();
    let autor = cria_usuario(&store, Perfil::Arquiteto).await;
    let item = cria_item(&store, Categoria::Constituinte, "Argamassa ACIII").await;

    let esp = esp_basica(
        autor.id,
        ConteudoSecoes {
            execucao: Some("Aplicar argamassa.".to_string()),
            constituintes_execucao_ids: vec![item.id],
            ..Default::default()
        },
    );
    store.create_esp(esp.clone()).await.unwrap();

    let exportado = service.export_esp_pdf(esp.id, autor.id).await.unwrap();
    assert_eq!(exportado.filename, "ESP-001.pdf");
    assert_eq!(exportado.content_type, "application/pdf");

    let texto = texto_do_pdf(&exportado.bytes);
    assert!(texto.contains("EXECUÇÃO"));
    assert!(texto.contains("Aplicar argamassa."));
    assert!(texto.contains("Constituintes (Execução):"));
    assert!(texto.contains("Argamassa ACIII"));

    // Trilha de auditoria gravada após a geração.
    let logs = store.list_logs(None).await.unwrap();
    assert_eq!(logs[0].acao, "EXPORTAR_PDF");
    assert_eq!(logs[0].alvo, esp.id.to_string());
}

#[tokio::test]
async fn secao_vazia_nao_ganha_titulo() {
    let (service, store, _) = servico();
    let autor = cria_usuario(&store, Perfil::Arquiteto).await;
    let esp = esp_basica(
        autor.id,
        ConteudoSecoes {
            legislacao: Some("NBR 13753".to_string()),
            ..Default::default()
        },
    );
    store.create_esp(esp.clone()).await.unwrap();

    let exportado = service.export_esp_pdf(esp.id, autor.id).await.unwrap();
    let texto = texto_do_pdf(&exportado.bytes);
    assert!(!texto.contains("EXECUÇÃO"));
    assert!(texto.contains("LEGISLAÇÃO"));
}

#[tokio::test]
async fn agregacao_segue_a_ordem_de_referencia() {
    let (service, store, _) = servico();
    let autor = cria_usuario(&store, Perfil::Arquiteto).await;

    // Criados em ordem inversa à de referência, com títulos fora de ordem
    // lexical, para garantir que só a ordem armazenada conta.
    let zeta = caderno_basico(
        autor.id,
        "Zeta",
        ConteudoSecoes {
            execucao: Some("Bloco do Zeta.".to_string()),
            ..Default::default()
        },
    );
    let alfa = caderno_basico(
        autor.id,
        "Alfa",
        ConteudoSecoes {
            execucao: Some("Bloco do Alfa.".to_string()),
            ..Default::default()
        },
    );
    store.create_caderno(alfa.clone()).await.unwrap();
    store.create_caderno(zeta.clone()).await.unwrap();

    let mut esp = esp_basica(
        autor.id,
        ConteudoSecoes {
            execucao: Some("Bloco da ESP.".to_string()),
            ..Default::default()
        },
    );
    esp.cadernos_ids = vec![zeta.id, alfa.id];
    store.create_esp(esp.clone()).await.unwrap();

    let exportado = service.export_esp_pdf(esp.id, autor.id).await.unwrap();
    let texto = texto_do_pdf(&exportado.bytes);

    let pos_esp = texto.find("Bloco da ESP.").unwrap();
    let pos_zeta = texto.find("Caderno Zeta:").unwrap();
    let pos_alfa = texto.find("Caderno Alfa:").unwrap();
    assert!(pos_esp < pos_zeta);
    assert!(pos_zeta < pos_alfa);
}

#[tokio::test]
async fn exportacao_docx_compartilha_a_agregacao() {
    let (service, store, _) = servico();
    let autor = cria_usuario(&store, Perfil::Diretor).await;
    let caderno = caderno_basico(
        autor.id,
        "Revestimentos",
        ConteudoSecoes {
            recebimento: Some("Conferir lote.".to_string()),
            ..Default::default()
        },
    );
    store.create_caderno(caderno.clone()).await.unwrap();

    let mut esp = esp_basica(autor.id, ConteudoSecoes::default());
    esp.cadernos_ids = vec![caderno.id];
    store.create_esp(esp.clone()).await.unwrap();

    let exportado = service.export_esp_docx(esp.id, autor.id).await.unwrap();
    assert_eq!(exportado.filename, "ESP-001.docx");

    let xml = xml_do_docx(&exportado.bytes);
    assert!(xml.contains("RECEBIMENTO"));
    assert!(xml.contains("Caderno Revestimentos:"));
    assert!(xml.contains("Conferir lote."));
    assert!(!xml.contains("EXECUÇÃO"));
}

#[tokio::test]
async fn exportacao_de_caderno_isolado() {
    let (service, store, _) = servico();
    let autor = cria_usuario(&store, Perfil::Arquiteto).await;
    let mut caderno = caderno_basico(
        autor.id,
        "Alvenaria",
        ConteudoSecoes {
            execucao: Some("Assentar blocos.".to_string()),
            ..Default::default()
        },
    );
    caderno.descricao = Some("Caderno de alvenaria estrutural.".to_string());
    store.create_caderno(caderno.clone()).await.unwrap();

    let exportado = service
        .export_caderno_pdf(caderno.id, autor.id)
        .await
        .unwrap();
    assert_eq!(exportado.filename, "caderno_alvenaria.pdf");

    let texto = texto_do_pdf(&exportado.bytes);
    assert!(texto.contains("INFORMAÇÕES DO CADERNO"));
    assert!(texto.contains("DESCRIÇÃO"));
    assert!(texto.contains("Caderno de alvenaria estrutural."));
    assert!(texto.contains("EXECUÇÃO"));
    assert!(texto.contains("Assentar blocos."));
}

#[tokio::test]
async fn esp_ausente_resulta_em_not_found() {
    let (service, store, _) = servico();
    let autor = cria_usuario(&store, Perfil::Arquiteto).await;
    let erro = service
        .export_esp_pdf(Uuid::new_v4(), autor.id)
        .await
        .unwrap_err();
    assert!(matches!(erro, ServiceError::NotFound(_)));
    // Nenhum log de exportação é gravado em falha.
    assert!(store.list_logs(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn autor_ausente_resulta_em_not_found() {
    let (service, store, _) = servico();
    let esp = esp_basica(Uuid::new_v4(), ConteudoSecoes::default());
    store.create_esp(esp.clone()).await.unwrap();

    let erro = service
        .export_esp_pdf(esp.id, Uuid::new_v4())
        .await
        .unwrap_err();
    match erro {
        ServiceError::NotFound(mensagem) => assert_eq!(mensagem, "Autor não encontrado"),
        outro => panic!("erro inesperado: {:?}", outro),
    }
}

#[tokio::test]
async fn upload_externo_faz_round_trip_byte_a_byte() {
    let (service, store, _) = servico();
    let autor = cria_usuario(&store, Perfil::Arquiteto).await;
    let esp = esp_basica(autor.id, ConteudoSecoes::default());
    store.create_esp(esp.clone()).await.unwrap();

    let bytes: Vec<u8> = (0..=255).cycle().take(4096).collect();
    let meta = service
        .upload_arquivo(
            NovoUpload {
                dono: DonoArquivo::Esp(esp.id),
                filename: "planta.png".to_string(),
                content_type: "image/png".to_string(),
                bytes: bytes.clone(),
            },
            autor.id,
        )
        .await
        .unwrap();
    assert_eq!(meta.tipo, TipoArquivo::Imagem);
    assert_eq!(meta.file_size, 4096);

    let arquivo = service.get_arquivo(meta.id).await.unwrap();
    assert!(!arquivo.ponteiro.is_inline());
    let lidos = service.bytes_do_arquivo(&arquivo).await.unwrap();
    assert_eq!(lidos, bytes);
}

#[tokio::test]
async fn upload_inline_faz_round_trip_byte_a_byte() {
    let (service, store, _) = servico();
    let service = service.com_uploads_inline();
    let autor = cria_usuario(&store, Perfil::Arquiteto).await;
    let esp = esp_basica(autor.id, ConteudoSecoes::default());
    store.create_esp(esp.clone()).await.unwrap();

    let bytes = b"conteudo inline".to_vec();
    let meta = service
        .upload_arquivo(
            NovoUpload {
                dono: DonoArquivo::Esp(esp.id),
                filename: "nota.pdf".to_string(),
                content_type: "application/pdf".to_string(),
                bytes: bytes.clone(),
            },
            autor.id,
        )
        .await
        .unwrap();

    let arquivo = service.get_arquivo(meta.id).await.unwrap();
    assert!(arquivo.ponteiro.is_inline());
    assert_eq!(service.bytes_do_arquivo(&arquivo).await.unwrap(), bytes);
}

#[tokio::test]
async fn ponteiro_legado_resolve_no_bucket_padrao() {
    let (service, store, blobs) = servico();
    let autor = cria_usuario(&store, Perfil::Arquiteto).await;
    let esp = esp_basica(autor.id, ConteudoSecoes::default());
    store.create_esp(esp.clone()).await.unwrap();

    let bytes = b"legado".to_vec();
    let objeto = blobs
        .guardar("esp_files", "antigo.pdf", "application/pdf", bytes.clone())
        .await
        .unwrap();

    // Forma legada de duas partes, sem bucket nomeado.
    let arquivo = ArquivoMidia {
        id: Uuid::new_v4(),
        dono: DonoArquivo::Esp(esp.id),
        tipo: TipoArquivo::Pdf,
        filename: "antigo.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        file_size: bytes.len() as i64,
        ponteiro: Ponteiro::parse(&format!("blob:{}", objeto)),
        created_at: Utc::now(),
    };
    store.create_arquivo(arquivo.clone()).await.unwrap();

    let lidos = service.bytes_do_arquivo(&arquivo).await.unwrap();
    assert_eq!(lidos, bytes);
}

#[tokio::test]
async fn upload_recusa_tipo_nao_permitido_e_excesso_de_tamanho() {
    let (service, store, _) = servico();
    let autor = cria_usuario(&store, Perfil::Arquiteto).await;
    let esp = esp_basica(autor.id, ConteudoSecoes::default());
    store.create_esp(esp.clone()).await.unwrap();

    let erro = service
        .upload_arquivo(
            NovoUpload {
                dono: DonoArquivo::Esp(esp.id),
                filename: "script.sh".to_string(),
                content_type: "application/x-sh".to_string(),
                bytes: vec![0],
            },
            autor.id,
        )
        .await
        .unwrap_err();
    assert!(matches!(erro, ServiceError::Upload(_)));

    let erro = service
        .upload_arquivo(
            NovoUpload {
                dono: DonoArquivo::Esp(esp.id),
                filename: "grande.png".to_string(),
                content_type: "image/png".to_string(),
                bytes: vec![0; 10 * 1024 * 1024 + 1],
            },
            autor.id,
        )
        .await
        .unwrap_err();
    assert!(matches!(erro, ServiceError::Upload(_)));
}

#[tokio::test]
async fn falha_ao_carregar_imagem_nao_derruba_a_exportacao() {
    let (service, store, _) = servico();
    let autor = cria_usuario(&store, Perfil::Arquiteto).await;
    let esp = esp_basica(
        autor.id,
        ConteudoSecoes {
            execucao: Some("Texto presente.".to_string()),
            ..Default::default()
        },
    );
    store.create_esp(esp.clone()).await.unwrap();

    // Ponteiro externo para um objeto que não existe no blob store.
    store
        .create_arquivo(ArquivoMidia {
            id: Uuid::new_v4(),
            dono: DonoArquivo::Esp(esp.id),
            tipo: TipoArquivo::Imagem,
            filename: "sumida.png".to_string(),
            content_type: "image/png".to_string(),
            file_size: 10,
            ponteiro: Ponteiro::externo("esp_files", "inexistente"),
            created_at: Utc::now(),
        })
        .await
        .unwrap();

    let exportado = service.export_esp_pdf(esp.id, autor.id).await.unwrap();
    let texto = texto_do_pdf(&exportado.bytes);
    assert!(texto.contains("Texto presente."));
}

#[tokio::test]
async fn conteudo_textual_e_identico_entre_exportacoes() {
    let (service, store, _) = servico();
    let autor = cria_usuario(&store, Perfil::Arquiteto).await;
    let item = cria_item(&store, Categoria::Constituinte, "Aço CA-50").await;
    let esp = esp_basica(
        autor.id,
        ConteudoSecoes {
            descricao_aplicacao: Some("Uso geral.".to_string()),
            constituintes_ids: vec![item.id],
            ..Default::default()
        },
    );
    store.create_esp(esp.clone()).await.unwrap();

    let primeiro = service.export_esp_pdf(esp.id, autor.id).await.unwrap();
    let segundo = service.export_esp_pdf(esp.id, autor.id).await.unwrap();

    // O rodapé carrega o instante de geração; todo o resto do texto
    // coincide linha a linha.
    let sem_rodape = |bytes: &[u8]| {
        texto_do_pdf(bytes)
            .lines()
            .filter(|linha| !linha.contains("Gerado em"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    assert_eq!(sem_rodape(&primeiro.bytes), sem_rodape(&segundo.bytes));
}
