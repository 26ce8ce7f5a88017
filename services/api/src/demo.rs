use crate::infra::{seed_demo_subjects, InMemoryCheckinSource, InMemoryWellbeingStore};
use clap::Args;
use qvt_ai::error::AppError;
use qvt_ai::workflows::routing::{
    EmbeddingProvider, HttpEmbeddingClient, ProfileCatalog, ProfileRouter, QueryRouter,
    RoutingRules, SemanticChannel,
};
use qvt_ai::workflows::wellbeing::{
    AlertScan, RecommendationPayload, SubjectId, TimeWindow, WellbeingService,
};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Free-text question routed to an expert profile at the end of the demo
    #[arg(long, default_value = "Comment couper les mails le soir sans risque ?")]
    question: String,
}

/// End-to-end walkthrough on seeded sample data: scoring, alert scan,
/// recommendations, and a routed question. Works offline; without API keys the
/// semantic channel simply reports itself as degraded.
pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let checkin_source = Arc::new(InMemoryCheckinSource::default());
    let subjects = seed_demo_subjects(&checkin_source);
    let store = Arc::new(InMemoryWellbeingStore::default());
    let service = WellbeingService::new(checkin_source.clone(), store.clone());

    println!("Wellbeing decision engine demo");
    println!("Seeded subjects: {}", subjects.len());

    for subject in &subjects {
        render_subject(&service, subject);
    }

    println!("\nStored scores: {}", store.scores().len());
    println!("Stored alerts: {}", store.alerts().len());

    let engine = ProfileRouter::new(ProfileCatalog::builtin(), RoutingRules::builtin())?;
    let providers: Vec<Arc<dyn EmbeddingProvider>> = vec![
        Arc::new(HttpEmbeddingClient::openai()),
        Arc::new(HttpEmbeddingClient::mistral()),
    ];
    let router = QueryRouter::new(engine, checkin_source, providers);

    render_routing(&router, &args.question, subjects.first()).await;

    Ok(())
}

fn render_subject<F, R>(service: &WellbeingService<F, R>, subject: &SubjectId)
where
    F: qvt_ai::workflows::wellbeing::FeatureAggregator + 'static,
    R: qvt_ai::workflows::wellbeing::WellbeingRepository + 'static,
{
    println!("\nSubject {}", subject.0);

    match service.compute_score(subject, TimeWindow::SevenDays) {
        Ok(report) => {
            println!("- score: {}/15", report.score);
            if report.rule_trace.is_empty() {
                println!("- rules: none fired");
            } else {
                println!("- rules: {}", report.rule_trace.join(", "));
            }
        }
        Err(err) => println!("- score unavailable: {err}"),
    }

    match service.scan_alerts(subject) {
        Ok(AlertScan::Created {
            risk_level,
            alert_id,
        }) => {
            println!("- alert: {} ({})", risk_level.label(), alert_id.0);
        }
        Ok(AlertScan::Clear) => println!("- alert: none"),
        Err(err) => println!("- alert scan failed: {err}"),
    }

    match service.recommendations(subject) {
        Ok(recommendations) if recommendations.is_empty() => {
            println!("- recommendations: none");
        }
        Ok(recommendations) => {
            println!("- recommendations:");
            for recommendation in recommendations {
                let title = match &recommendation.payload {
                    RecommendationPayload::Ritual { title, .. } => title.clone(),
                    RecommendationPayload::Resource { title, .. } => title.clone(),
                    RecommendationPayload::CareBox { sku, .. } => sku.clone(),
                };
                println!("  * [{}] {}", recommendation.kind.label(), title);
            }
        }
        Err(err) => println!("- recommendations failed: {err}"),
    }
}

async fn render_routing<F>(router: &QueryRouter<F>, question: &str, subject: Option<&SubjectId>)
where
    F: qvt_ai::workflows::wellbeing::FeatureAggregator + 'static,
{
    println!("\nRouting question: {question}");

    let decision = router.route(question, subject, None).await;

    match &decision.semantic {
        SemanticChannel::Active => println!("Semantic channel: active"),
        SemanticChannel::Degraded { reason } => {
            println!("Semantic channel: degraded ({reason})");
        }
    }

    if decision.need_tags.is_empty() {
        println!("Derived need tags: none");
    } else {
        println!("Derived need tags: {}", decision.need_tags.join(", "));
    }

    println!("Chosen profile: {}", decision.chosen_profile_id);
    println!("Per-profile totals:");
    for profile in &decision.profiles {
        println!(
            "- {}: total {:.2} (keywords {:.2}, signals {:.2}, semantic {:.2})",
            profile.profile_id,
            profile.total,
            profile.contributions.keywords,
            profile.contributions.signals,
            profile.contributions.semantic
        );
    }
}
