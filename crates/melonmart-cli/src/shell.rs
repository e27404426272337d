//! Interactive storefront shell.
//!
//! Owns the in-memory cart for the life of the process and routes every
//! command through the application services. Failures are printed, never
//! propagated: a failed action leaves the shell (and the cart) as it was.

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use melonmart_application::{
    AppContext, CartService, CheckoutService, SellerService, SessionService,
};
use melonmart_core::{
    CheckoutState, HydrationOutcome, ImageUpload, LogoutEffect, MartError, NewProductForm,
    Product, ProductId, ProfileUpdate, QualityAnalyzer,
};

use crate::format::{format_rupiah, format_shipping};
use crate::widget::ConsolePaymentWidget;

const HELP: &str = "\
  catalog                 list products
  show <id>               product detail
  add <id> [qty]          add to cart (default qty 1)
  remove <id>             remove a line from the cart
  cart                    show cart and totals
  clear                   empty the cart
  register <username>     create an account
  login <username>        log in with a password
  google <credential>     log in with a federated credential
  whoami                  show the logged-in user
  profile <username>      update the profile username
  logout                  log out and return home
  checkout                pay for the cart
  sell                    submit a product (seller)
  help                    this text
  quit                    leave the shell";

pub struct Shell {
    ctx: Arc<AppContext>,
    session: Arc<SessionService>,
    cart: CartService,
    checkout: CheckoutService,
    seller: SellerService,
}

impl Shell {
    pub fn new(ctx: Arc<AppContext>, analyzer: Option<Arc<dyn QualityAnalyzer>>) -> Self {
        let mut seller = SellerService::new(ctx.clone());
        if let Some(analyzer) = analyzer {
            seller = seller.with_analyzer(analyzer);
        }
        Self {
            session: Arc::new(SessionService::new(ctx.clone())),
            cart: CartService::new(ctx.clone()),
            checkout: CheckoutService::new(ctx.clone()),
            seller,
            ctx,
        }
    }

    pub async fn run(self) -> Result<()> {
        self.print_home();

        // Hydration must never block the prompt; failures stay silent
        // because an expired session is routine, not a user action failing.
        {
            let session = self.session.clone();
            let ctx = self.ctx.clone();
            tokio::spawn(async move {
                if session.hydrate().await == HydrationOutcome::Restored {
                    if let Some(user) = ctx.current_user().await {
                        println!("{} {}", "Welcome back,".green(), user.username.bold());
                    }
                }
            });
        }

        let mut rl = DefaultEditor::new()?;
        loop {
            match rl.readline("melonmart> ") {
                Ok(line) => {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(&line);
                    if !self.dispatch(&line, &mut rl).await {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    /// Returns `false` when the shell should exit.
    async fn dispatch(&self, line: &str, rl: &mut DefaultEditor) -> bool {
        let mut parts = line.split_whitespace();
        let cmd = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();
        debug!(command = cmd, "dispatching");

        match cmd {
            "quit" | "exit" => return false,
            "help" => println!("{HELP}"),
            "catalog" => self.show_catalog().await,
            "show" => match args.first() {
                Some(id) => self.show_product(id).await,
                None => usage("show <id>"),
            },
            "add" => match args.first() {
                Some(id) => {
                    let qty = args.get(1).and_then(|q| q.parse().ok()).unwrap_or(1);
                    self.add(id, qty).await;
                }
                None => usage("add <id> [qty]"),
            },
            "remove" => match args.first() {
                Some(id) => {
                    if self.cart.remove_from_cart(&ProductId::from(*id)).await {
                        println!("Removed {id} from the cart");
                    } else {
                        println!("Nothing in the cart with id {id}");
                    }
                }
                None => usage("remove <id>"),
            },
            "cart" => self.show_cart().await,
            "clear" => {
                self.cart.clear_cart().await;
                println!("Cart emptied");
            }
            "register" => match args.first() {
                Some(username) => self.register(username, rl).await,
                None => usage("register <username>"),
            },
            "login" => match args.first() {
                Some(username) => self.login(username, rl).await,
                None => usage("login <username>"),
            },
            "google" => match args.first() {
                Some(credential) => {
                    if let Err(err) = self.session.login_with_google(credential).await {
                        print_error(&err);
                    } else {
                        self.print_whoami().await;
                    }
                }
                None => usage("google <credential>"),
            },
            "whoami" => self.print_whoami().await,
            "profile" => match args.first() {
                Some(username) => self.update_profile(username, args.get(1).copied()).await,
                None => usage("profile <username> [picture-url]"),
            },
            "logout" => match self.session.logout().await {
                // Hard-reset semantics: nothing from the old session
                // survives on screen.
                LogoutEffect::NavigateHome => self.print_home(),
            },
            "checkout" => self.run_checkout().await,
            "sell" => self.sell(rl).await,
            _ => println!("Unknown command '{cmd}'. Try 'help'."),
        }
        true
    }

    fn print_home(&self) {
        println!(
            "{}",
            "MelonMart — fresh melons, delivered".green().bold()
        );
        println!("Type 'help' for commands.\n");
    }

    async fn show_catalog(&self) {
        match self.ctx.gateway().list_products().await {
            Ok(products) => {
                for product in &products {
                    print_product_line(product);
                }
                if products.is_empty() {
                    println!("The catalog is empty right now.");
                }
            }
            Err(err) => print_error(&err),
        }
    }

    async fn show_product(&self, id: &str) {
        match self.ctx.gateway().product_detail(&ProductId::from(id)).await {
            Ok(product) => {
                print_product_line(&product);
                if !product.description.is_empty() {
                    println!("  {}", product.description);
                }
                if !product.origin.is_empty() {
                    println!("  Origin: {}", product.origin);
                }
                if let Some(brix) = product.sweetness_brix {
                    println!("  Sweetness: {brix} Brix");
                }
            }
            Err(err) => print_error(&err),
        }
    }

    async fn add(&self, id: &str, qty: u32) {
        let product = match self.ctx.gateway().product_detail(&ProductId::from(id)).await {
            Ok(product) => product,
            Err(err) => return print_error(&err),
        };
        let name = product.name.clone();
        match self.cart.add_to_cart(product, qty).await {
            Ok(()) => println!("Added {qty} x {name}"),
            Err(err) => print_error(&err),
        }
    }

    async fn show_cart(&self) {
        let lines = self.cart.lines().await;
        if lines.is_empty() {
            println!("Your cart is empty. Try 'catalog'.");
            return;
        }
        for line in &lines {
            println!(
                "  {:>3} x {:<28} {}",
                line.qty,
                line.product.name,
                format_rupiah(line.line_total())
            );
        }
        let totals = self.cart.totals().await;
        println!("  {:<34} {}", "Subtotal", format_rupiah(totals.subtotal));
        println!("  {:<34} {}", "Shipping", format_shipping(totals.shipping));
        println!(
            "  {:<34} {}",
            "Total".bold(),
            format_rupiah(totals.total).bold()
        );
    }

    async fn register(&self, username: &str, rl: &mut DefaultEditor) {
        let password = match rl.readline("password: ") {
            Ok(password) => password,
            Err(_) => return,
        };
        match self.session.register(username, password.trim()).await {
            Ok(_) => println!("Account created. Log in with 'login {username}'."),
            Err(err) => print_error(&err),
        }
    }

    async fn login(&self, username: &str, rl: &mut DefaultEditor) {
        let password = match rl.readline("password: ") {
            Ok(password) => password,
            Err(_) => return,
        };
        match self
            .session
            .login_with_password(username, password.trim())
            .await
        {
            Ok(user) => println!("{} {}", "Logged in as".green(), user.username.bold()),
            Err(err) => print_error(&err),
        }
    }

    async fn print_whoami(&self) {
        match self.ctx.current_user().await {
            Some(user) => {
                println!("{} (id {})", user.username.bold(), user.id);
                if !user.email.is_empty() {
                    println!("  {}", user.email);
                }
            }
            None => println!("Not logged in."),
        }
    }

    async fn update_profile(&self, username: &str, picture: Option<&str>) {
        let update = ProfileUpdate {
            username: username.to_string(),
            picture: picture.unwrap_or_default().to_string(),
        };
        match self.session.update_profile(&update).await {
            Ok(user) => println!("Profile updated: {}", user.username.bold()),
            Err(err) => print_error(&err),
        }
    }

    async fn run_checkout(&self) {
        match self.checkout.checkout(&ConsolePaymentWidget).await {
            Ok(report) => match report.state {
                CheckoutState::Succeeded => {
                    println!(
                        "{} Order of {} is being processed.",
                        "Payment confirmed!".green().bold(),
                        format_rupiah(report.totals.total)
                    );
                }
                CheckoutState::Pending => {
                    println!("{}", "Awaiting payment confirmation...".yellow());
                }
                CheckoutState::Failed => {
                    let detail = report.message.unwrap_or_else(|| "Payment failed".to_string());
                    println!("{} {}", "Payment failed:".red(), detail);
                    println!("Your cart is untouched; try 'checkout' again.");
                }
                CheckoutState::Cancelled => {
                    println!("Payment window closed. Your cart is waiting.");
                }
                other => debug!(?other, "checkout ended in a non-terminal state"),
            },
            Err(err) => print_error(&err),
        }
    }

    async fn sell(&self, rl: &mut DefaultEditor) {
        let form = match self.prompt_form(rl).await {
            Some(form) => form,
            None => return,
        };
        match self.seller.submit_product(form).await {
            Ok(submission) => {
                println!(
                    "{} {} listed at {}",
                    "Submitted:".green(),
                    submission.product.name.bold(),
                    format_rupiah(submission.product.price)
                );
                if let Some(assessment) = submission.assessment {
                    println!(
                        "  Graded {} (ripeness {:.0}, est. {:.1} Brix)",
                        assessment.grade, assessment.ripeness_score, assessment.sweetness_prediction
                    );
                    for defect in &assessment.defects {
                        println!("  - {defect}");
                    }
                }
            }
            Err(err) => print_error(&err),
        }
    }

    async fn prompt_form(&self, rl: &mut DefaultEditor) -> Option<NewProductForm> {
        let name = rl.readline("name: ").ok()?;
        let price = rl.readline("price (rupiah): ").ok()?;
        let price = match price.trim().parse::<u64>() {
            Ok(price) => price,
            Err(_) => {
                println!("{}", "Price must be a whole rupiah amount".red());
                return None;
            }
        };
        let category = rl.readline("category: ").ok()?;
        let description = rl.readline("description: ").ok()?;
        let origin = rl.readline("origin: ").ok()?;
        let harvest = rl.readline("harvest date YYYY-MM-DD (blank to skip): ").ok()?;
        let harvest_date = match harvest.trim() {
            "" => None,
            raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    println!("{}", "Harvest date must be YYYY-MM-DD".red());
                    return None;
                }
            },
        };
        let image_path = rl.readline("image file (blank to skip): ").ok()?;

        let image = match image_path.trim() {
            "" => None,
            path => match tokio::fs::read(path).await {
                Ok(bytes) => Some(ImageUpload {
                    bytes,
                    mime: mime_for_path(path),
                    filename: path.rsplit('/').next().unwrap_or(path).to_string(),
                }),
                Err(err) => {
                    println!("{} {err}", "Could not read image:".red());
                    return None;
                }
            },
        };

        Some(NewProductForm {
            name: name.trim().to_string(),
            price,
            category: category.trim().to_string(),
            description: description.trim().to_string(),
            origin: origin.trim().to_string(),
            harvest_date,
            image,
            ..Default::default()
        })
    }
}

fn mime_for_path(path: &str) -> String {
    match path.rsplit('.').next().map(str::to_lowercase).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
    .to_string()
}

fn print_product_line(product: &Product) {
    let stock = match product.stock {
        Some(stock) => format!("stock {stock}"),
        None => "stock n/a".to_string(),
    };
    println!(
        "  [{}] {:<28} {:<12} grade {:<3} {}",
        product.id,
        product.name.bold(),
        format_rupiah(product.price),
        product.quality_grade,
        stock.dimmed()
    );
}

fn print_error(err: &MartError) {
    println!("{} {err}", "Error:".red().bold());
}

fn usage(text: &str) {
    println!("Usage: {text}");
}
