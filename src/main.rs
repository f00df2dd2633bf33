use std::sync::Arc;
use std::time::Duration;

use enroll_assist::config::WizardConfig;
use enroll_assist::ports::memory::{
    MemoryProfileStore, RecordingNavigator, RecordingNotifier, RecordingSession, SimulatedGateway,
};
use enroll_assist::ports::{Navigator, Notifier, PaymentGateway, ProfileStore, Session};
use enroll_assist::wizard::{EnrollmentWizard, UploadedDocument, WizardDeps};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let gateway_delay_ms: u64 = std::env::var("ENROLL_ASSIST_GATEWAY_DELAY_MS")
        .unwrap_or_else(|_| "1500".to_string())
        .parse()
        .unwrap_or(1500);

    let min_documents: usize = std::env::var("ENROLL_ASSIST_MIN_DOCS")
        .unwrap_or_else(|_| "3".to_string())
        .parse()
        .unwrap_or(3);

    eprintln!("📋 Enroll Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Gateway delay: {}ms", gateway_delay_ms);
    eprintln!("   Required documents: {}\n", min_documents);

    let config = WizardConfig {
        min_documents,
        gateway_delay: Duration::from_millis(gateway_delay_ms),
        ..WizardConfig::default()
    };

    let session = Arc::new(RecordingSession::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let profile = Arc::new(MemoryProfileStore::new());
    let navigator = Arc::new(RecordingNavigator::new());
    let gateway = Arc::new(SimulatedGateway::new(config.gateway_delay));

    let mut wizard = EnrollmentWizard::new(
        config,
        WizardDeps {
            session: Arc::clone(&session) as Arc<dyn Session>,
            notifier: Arc::clone(&notifier) as Arc<dyn Notifier>,
            profile: Arc::clone(&profile) as Arc<dyn ProfileStore>,
            navigator: Arc::clone(&navigator) as Arc<dyn Navigator>,
            gateway: Arc::clone(&gateway) as Arc<dyn PaymentGateway>,
        },
    );

    // Step 1: advancing an empty draft is refused with a step message.
    let _ = wizard.next();

    wizard.attach_photo(UploadedDocument::new("kasun.png", "image/png", 48_211));
    {
        let personal = &mut wizard.draft_mut().personal;
        personal.name = "Kasun".to_string();
        personal.full_name = "Kasun Perera".to_string();
        personal.nic = "981234567V".to_string();
        personal.address = "12, Galle Road, Colombo 03".to_string();
        personal.institute = "NIBM".to_string();
        personal.course = "Software Engineering".to_string();
    }
    wizard.next()?;

    // Step 2: a bad email surfaces as a field error on blur, then is fixed.
    wizard.draft_mut().contact.email = "kasun@example".to_string();
    wizard.field_blurred("contact.email");
    if let Some(message) = wizard.field_error("contact.email") {
        eprintln!("   Field error: contact.email → {}", message);
    }
    {
        let contact = &mut wizard.draft_mut().contact;
        contact.email = "kasun@example.com".to_string();
        contact.mobile_no = "0771234567".to_string();
        contact.emergency_contact_name = "Nimal Perera".to_string();
        contact.emergency_contact_no = "0719876543".to_string();
    }
    wizard.field_changed("contact.email");
    wizard.next()?;

    // Step 3: one upload is rejected by type, and the count gate holds
    // until the third accepted document arrives.
    wizard.accept_documents(vec![
        UploadedDocument::new("nic-copy.pdf", "application/pdf", 220_104),
        UploadedDocument::new("certificate.pdf", "application/pdf", 180_330),
        UploadedDocument::new("notes.txt", "text/plain", 1_024),
    ]);
    let _ = wizard.next();
    wizard.accept_documents(vec![UploadedDocument::new(
        "payment-slip.png",
        "image/png",
        96_512,
    )]);
    wizard.next()?;

    // Step 4: first attempt hits a simulated gateway outage, the retry
    // succeeds with the retained draft.
    {
        let payment = &mut wizard.draft_mut().payment;
        payment.card_holder = "K. Perera".to_string();
        payment.card_number = "4242 4242 4242 4242".to_string();
        payment.expiry = "12/27".to_string();
        payment.cvv = "123".to_string();
    }
    gateway.fail_next();
    if wizard.submit().await.is_err() {
        eprintln!("   First submission failed, retrying with the same draft...");
    }
    let receipt = wizard.submit().await?;

    eprintln!("\n── Transcript ──────────────────────────────────");
    for notice in notifier.notices() {
        eprintln!("   [{:?}] {}", notice.level, notice.message);
    }
    eprintln!("\n   Receipt: {} at {}", receipt.reference, receipt.processed_at);
    eprintln!("   Profile: {:?}", profile.snapshot().await);
    eprintln!("   Navigated to: {:?}", navigator.visits());

    Ok(())
}
