//! Hand-written mock collaborators shared by the service tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use melonmart_core::{
    AuthToken, MartError, NewProductForm, PaymentOutcome, PaymentRequest, PaymentTransaction,
    PaymentWidget, Product, ProductId, ProfileUpdate, QualityAnalyzer, QualityAssessment,
    QualityGrade, Result, StorefrontGateway, TokenStore, User,
};

pub fn sample_user() -> User {
    User {
        id: 7,
        username: "budi".to_string(),
        email: "budi@example.com".to_string(),
        picture: None,
    }
}

pub fn sample_product(id: u64, price: u64) -> Product {
    Product {
        id: ProductId::from(id),
        name: format!("Melon #{id}"),
        description: String::new(),
        price,
        category: "Standard".to_string(),
        quality_grade: "A".to_string(),
        rating: None,
        review_count: None,
        image_url: String::new(),
        origin: String::new(),
        harvest_date: None,
        sweetness_brix: None,
        stock: Some(10),
        seller: None,
    }
}

/// Rendezvous used to hold a mock call open while the test interleaves
/// other operations.
pub struct Gate {
    /// Notified by the mock when the held call has started.
    pub entered: Notify,
    /// Notified by the test to let the held call finish.
    pub release: Notify,
}

impl Gate {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            entered: Notify::new(),
            release: Notify::new(),
        })
    }

    /// Arms the gate on the gateway's `fetch_profile`.
    pub fn arm(gateway: &MockGateway) -> Arc<Self> {
        let gate = Self::new();
        *gateway.profile_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Arms the gate on the widget's `present`.
    pub fn arm_widget(widget: &ScriptedWidget) -> Arc<Self> {
        let gate = Self::new();
        *widget.gate.lock().unwrap() = Some(gate.clone());
        gate
    }
}

async fn pass_gate(slot: &Mutex<Option<Arc<Gate>>>) {
    let gate = slot.lock().unwrap().clone();
    if let Some(gate) = gate {
        gate.entered.notify_one();
        gate.release.notified().await;
    }
}

/// In-memory [`TokenStore`].
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new(token: Option<&str>) -> Self {
        Self {
            slot: Mutex::new(token.map(str::to_string)),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self.slot.lock().unwrap().clone())
    }

    async fn save(&self, token: &str) -> Result<()> {
        *self.slot.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    async fn purge(&self) -> Result<()> {
        *self.slot.lock().unwrap() = None;
        Ok(())
    }
}

/// Scriptable [`StorefrontGateway`] recording call counts.
pub struct MockGateway {
    pub login_result: Mutex<Result<AuthToken>>,
    pub profile_result: Mutex<Result<User>>,
    pub payment_result: Mutex<Result<PaymentTransaction>>,
    pub login_calls: AtomicUsize,
    pub profile_calls: AtomicUsize,
    pub update_profile_calls: AtomicUsize,
    pub payment_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub profile_gate: Mutex<Option<Arc<Gate>>>,
    last_created_form: Mutex<Option<NewProductForm>>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self {
            login_result: Mutex::new(Ok(AuthToken {
                token: "jwt-login".to_string(),
            })),
            profile_result: Mutex::new(Ok(sample_user())),
            payment_result: Mutex::new(Ok(PaymentTransaction {
                token: "txn-1".to_string(),
            })),
            login_calls: AtomicUsize::new(0),
            profile_calls: AtomicUsize::new(0),
            update_profile_calls: AtomicUsize::new(0),
            payment_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            profile_gate: Mutex::new(None),
            last_created_form: Mutex::new(None),
        }
    }
}

impl MockGateway {
    pub fn set_profile_result(&self, result: Result<User>) {
        *self.profile_result.lock().unwrap() = result;
    }

    pub fn set_payment_result(&self, result: Result<PaymentTransaction>) {
        *self.payment_result.lock().unwrap() = result;
    }

    pub fn last_created_form_grade(&self) -> Option<String> {
        self.last_created_form
            .lock()
            .unwrap()
            .as_ref()
            .and_then(|form| form.quality_grade.clone())
    }
}

#[async_trait]
impl StorefrontGateway for MockGateway {
    async fn register(&self, username: &str, _password: &str) -> Result<serde_json::Value> {
        Ok(serde_json::json!({ "username": username }))
    }

    async fn login(&self, _username: &str, _password: &str) -> Result<AuthToken> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.login_result.lock().unwrap().clone()
    }

    async fn login_with_google(&self, _credential: &str) -> Result<AuthToken> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.login_result.lock().unwrap().clone()
    }

    async fn fetch_profile(&self, _token: &str) -> Result<User> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        pass_gate(&self.profile_gate).await;
        self.profile_result.lock().unwrap().clone()
    }

    async fn update_profile(&self, _token: &str, update: &ProfileUpdate) -> Result<User> {
        self.update_profile_calls.fetch_add(1, Ordering::SeqCst);
        let mut user = self.profile_result.lock().unwrap().clone()?;
        user.username = update.username.clone();
        Ok(user)
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(vec![sample_product(1, 125_000), sample_product(2, 95_000)])
    }

    async fn product_detail(&self, id: &ProductId) -> Result<Product> {
        Ok(Product {
            id: id.clone(),
            ..sample_product(0, 125_000)
        })
    }

    async fn create_product(&self, _token: &str, form: &NewProductForm) -> Result<Product> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_created_form.lock().unwrap() = Some(form.clone());
        let mut product = sample_product(99, form.price);
        product.name = form.name.clone();
        product.quality_grade = form.quality_grade.clone().unwrap_or_default();
        Ok(product)
    }

    async fn create_payment(
        &self,
        _token: &str,
        _request: &PaymentRequest,
    ) -> Result<PaymentTransaction> {
        self.payment_calls.fetch_add(1, Ordering::SeqCst);
        self.payment_result.lock().unwrap().clone()
    }
}

/// [`PaymentWidget`] returning a scripted outcome.
pub struct ScriptedWidget {
    pub outcome: Mutex<PaymentOutcome>,
    pub calls: AtomicUsize,
    pub gate: Mutex<Option<Arc<Gate>>>,
}

impl ScriptedWidget {
    pub fn with_outcome(outcome: PaymentOutcome) -> Self {
        Self {
            outcome: Mutex::new(outcome),
            calls: AtomicUsize::new(0),
            gate: Mutex::new(None),
        }
    }

    pub fn succeeding() -> Self {
        Self::with_outcome(PaymentOutcome::Success)
    }
}

#[async_trait]
impl PaymentWidget for ScriptedWidget {
    async fn present(&self, _transaction_token: &str) -> PaymentOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        pass_gate(&self.gate).await;
        self.outcome.lock().unwrap().clone()
    }
}

/// [`QualityAnalyzer`] returning a fixed assessment.
pub struct FixedAnalyzer {
    assessment: QualityAssessment,
}

impl FixedAnalyzer {
    pub fn grade(grade: QualityGrade) -> Self {
        Self {
            assessment: QualityAssessment {
                grade,
                ripeness_score: 90.0,
                sweetness_prediction: 16.0,
                defects: Vec::new(),
                reasoning: "scripted".to_string(),
            },
        }
    }
}

#[async_trait]
impl QualityAnalyzer for FixedAnalyzer {
    async fn analyze(&self, _image: &[u8], _mime: &str) -> Result<QualityAssessment> {
        Ok(self.assessment.clone())
    }
}

/// [`QualityAnalyzer`] that always fails.
pub struct FailingAnalyzer;

#[async_trait]
impl QualityAnalyzer for FailingAnalyzer {
    async fn analyze(&self, _image: &[u8], _mime: &str) -> Result<QualityAssessment> {
        Err(MartError::network("analysis service down"))
    }
}
