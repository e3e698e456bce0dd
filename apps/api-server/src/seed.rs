//! Sample roster and posts for demos and local development.
//!
//! Everything goes through the registry's public operations, so seeded posts
//! obey the same workflow rules as real ones. Times are relative to startup.

use chrono::Duration;

use cadence_core::DomainError;
use cadence_core::domain::{ContentType, NewPost, Network, PostStatus};

use crate::state::AppState;

const CLIENTS: [(&str, &str); 6] = [
    ("loja-fashion", "Loja Fashion"),
    ("tech-solutions", "Tech Solutions"),
    ("restaurante-sabor", "Restaurante Sabor"),
    ("academia-fit", "Academia Fit"),
    ("clinica-bem-estar", "Clínica Bem Estar"),
    ("advocacia-silva", "Advocacia Silva"),
];

struct Sample {
    title: &'static str,
    client: &'static str,
    content: &'static str,
    content_type: ContentType,
    networks: &'static [Network],
    /// Hours from now.
    in_hours: i64,
    urgent: bool,
    comments: &'static [&'static str],
    /// Where to leave the post in the workflow.
    status: PostStatus,
}

const SAMPLES: &[Sample] = &[
    Sample {
        title: "Promoção de Verão",
        client: "loja-fashion",
        content: "Aproveite 50% de desconto em todas as peças de verão! #LojaFashion #PromoçãoVerão",
        content_type: ContentType::Image,
        networks: &[Network::Instagram, Network::Facebook],
        in_hours: 52,
        urgent: true,
        comments: &[],
        status: PostStatus::Pending,
    },
    Sample {
        title: "Dicas de Tecnologia",
        client: "tech-solutions",
        content: "5 dicas para aumentar a produtividade da sua equipe com ferramentas de TI modernas.",
        content_type: ContentType::Carousel,
        networks: &[Network::Linkedin, Network::Twitter],
        in_hours: 24,
        urgent: false,
        comments: &["Verificar se as imagens estão corretas"],
        status: PostStatus::Pending,
    },
    Sample {
        title: "Happy Hour Especial",
        client: "restaurante-sabor",
        content: "Toda sexta-feira é dia de Happy Hour! Chopp por R$9,90 das 17h às 20h.",
        content_type: ContentType::Video,
        networks: &[Network::Instagram, Network::Facebook, Network::Twitter],
        in_hours: 150,
        urgent: false,
        comments: &["Ajustar horário do vídeo", "Adicionar logo no final"],
        status: PostStatus::Pending,
    },
    Sample {
        title: "Novidades Janeiro",
        client: "academia-fit",
        content: "Novas turmas de funcional e pilates a partir desta semana.",
        content_type: ContentType::Image,
        networks: &[Network::Instagram],
        in_hours: 72,
        urgent: false,
        comments: &[],
        status: PostStatus::Scheduled,
    },
    Sample {
        title: "Serviços Premium",
        client: "clinica-bem-estar",
        content: "Conheça nossos pacotes de bem-estar com acompanhamento personalizado.",
        content_type: ContentType::Text,
        networks: &[Network::Facebook, Network::Linkedin],
        in_hours: 96,
        urgent: false,
        comments: &[],
        status: PostStatus::Approved,
    },
    Sample {
        title: "Consultoria Gratuita",
        client: "advocacia-silva",
        content: "Agende uma primeira consulta sem custo com nossa equipe.",
        content_type: ContentType::Text,
        networks: &[Network::Linkedin],
        in_hours: 120,
        urgent: false,
        comments: &[],
        status: PostStatus::Draft,
    },
    Sample {
        title: "Flash Sale",
        client: "loja-fashion",
        content: "Só hoje: frete grátis em todo o site!",
        content_type: ContentType::Image,
        networks: &[Network::Instagram, Network::Twitter],
        in_hours: 30,
        urgent: false,
        comments: &[],
        status: PostStatus::Rejected,
    },
];

/// Load the sample clients and posts. Returns the number of posts created.
pub async fn seed(state: &AppState) -> Result<usize, DomainError> {
    for (client_ref, name) in CLIENTS {
        state.clients.upsert(client_ref, name).await;
    }

    let registry = &state.registry;
    let now = registry.now();

    for sample in SAMPLES {
        let at = now + Duration::hours(sample.in_hours);
        let post = registry
            .create(NewPost {
                title: sample.title.to_string(),
                client_ref: sample.client.to_string(),
                content: sample.content.to_string(),
                content_type: sample.content_type,
                networks: sample.networks.to_vec(),
                scheduled_for: Some(at),
                urgent: sample.urgent,
            })
            .await?;
        let id = post.id();

        for comment in sample.comments {
            registry.add_comment(id, comment.to_string()).await?;
        }

        if sample.status == PostStatus::Draft {
            continue;
        }
        registry.submit_for_approval(id).await?;

        match sample.status {
            PostStatus::Rejected => {
                registry
                    .reject(id, "Preço incorreto na arte".to_string())
                    .await?;
            }
            PostStatus::Approved => {
                registry.approve(id).await?;
            }
            PostStatus::Scheduled => {
                registry.approve(id).await?;
                registry.schedule(id, at).await?;
            }
            _ => {}
        }
    }

    tracing::info!(
        clients = CLIENTS.len(),
        posts = SAMPLES.len(),
        "Sample data loaded"
    );
    Ok(SAMPLES.len())
}
