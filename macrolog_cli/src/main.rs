use clap::Parser;
use macrolog_core::*;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "macrolog")]
#[command(about = "Daily nutrition ledger with AI food lookup", long_about = None)]
struct Cli {
    /// Override config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the completion model for this session
    #[arg(long)]
    model: Option<String>,

    /// Override the daily calorie goal for this session
    #[arg(long)]
    goal_calories: Option<f64>,
}

/// One interactive tracking session: a single ledger plus the profile it
/// is measured against. Lives exactly as long as the process.
struct Session<'a> {
    ledger: DailyLedger,
    profile: UserProfile,
    water_quantum_ml: f64,
    foods: &'a dyn FoodSource,
    advisor: &'a dyn AdviceSource,
    advice: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    macrolog_core::logging::init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(model) = cli.model {
        config.gateway.model = model;
    }

    let mut profile = config.profile.to_profile(config.goals.to_goals());
    if let Some(calories) = cli.goal_calories {
        profile.macro_goals.calories = calories;
    }

    let gateway = OpenRouterGateway::new(&config.gateway)?;

    let mut session = Session {
        ledger: DailyLedger::new(),
        profile,
        water_quantum_ml: config.water.quantum_ml,
        foods: &gateway,
        advisor: &gateway,
        advice: None,
    };

    session.run().await
}

impl Session<'_> {
    async fn run(&mut self) -> Result<()> {
        self.print_dashboard();
        println!("Type 'help' for commands.");

        loop {
            print!("> ");
            io::stdout().flush()?;

            let mut input = String::new();
            if io::stdin().read_line(&mut input)? == 0 {
                break; // EOF
            }

            let line = input.trim();
            if line.is_empty() {
                continue;
            }

            let (command, rest) = match line.split_once(char::is_whitespace) {
                Some((c, r)) => (c, r.trim()),
                None => (line, ""),
            };

            match command.to_lowercase().as_str() {
                "help" => print_help(),
                "today" => self.print_dashboard(),
                "log" => self.cmd_log(rest).await?,
                "scan" => self.cmd_scan(rest).await,
                "custom" => self.cmd_custom(rest),
                "list" => self.cmd_list(),
                "remove" => self.cmd_remove(rest),
                "water" => self.cmd_water(),
                "advice" => self.cmd_advice().await,
                "dismiss" => self.cmd_dismiss(),
                "quit" | "exit" | "q" => break,
                other => println!("Unknown command: {}. Type 'help'.", other),
            }
        }

        Ok(())
    }

    fn print_dashboard(&self) {
        let today = chrono::Utc::now().date_naive();
        let consumed = self.ledger.totals_for(today);
        let goals = &self.profile.macro_goals;
        let remaining = self.ledger.remaining(goals, today);
        let water = self.ledger.water_for(today);

        println!("\n╭─────────────────────────────────────────╮");
        println!("│  TODAY — {}", today);
        println!("╰─────────────────────────────────────────╯");
        println!("  Let's hit those macros, {}.", self.profile.name);
        println!(
            "  Calories  {:>6.0} / {:<6.0} kcal  ({:.0} left)",
            consumed.calories, goals.calories, remaining.calories
        );
        println!(
            "  Protein   {:>6.0} / {:<6.0} g     ({:.0} left)",
            consumed.protein_g, goals.protein_g, remaining.protein_g
        );
        println!(
            "  Carbs     {:>6.0} / {:<6.0} g     ({:.0} left)",
            consumed.carbs_g, goals.carbs_g, remaining.carbs_g
        );
        println!(
            "  Fat       {:>6.0} / {:<6.0} g     ({:.0} left)",
            consumed.fat_g, goals.fat_g, remaining.fat_g
        );
        println!(
            "  Water     {:>6.0} / {:<6.0} ml    ({:.0} left)",
            water, goals.water_ml, remaining.water_ml
        );
        println!();
    }

    async fn cmd_log(&mut self, query: &str) -> Result<()> {
        if query.is_empty() {
            println!("Usage: log <search text>");
            return Ok(());
        }

        println!("Searching for \"{}\"...", query);
        let candidates = self.foods.search(query).await;

        if candidates.is_empty() {
            println!("No foods matched \"{}\". Try different words.", query);
            return Ok(());
        }

        for (i, item) in candidates.iter().enumerate() {
            println!("  {}. {}", i + 1, describe(item));
        }
        print!("Select # to log (Enter to cancel): ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        match input.trim().parse::<usize>() {
            Ok(n) if n >= 1 && n <= candidates.len() => {
                let food = candidates[n - 1].clone();
                let entry = self.ledger.add_entry(food, chrono::Utc::now());
                println!("✓ Logged {}", describe(&entry.food));
            }
            _ => println!("Cancelled — nothing logged."),
        }

        Ok(())
    }

    async fn cmd_scan(&mut self, code: &str) {
        if code.is_empty() {
            println!("Usage: scan <barcode>");
            return;
        }

        println!("Looking up barcode {}...", code);
        match self.foods.identify_barcode(code).await {
            Some(food) => {
                let entry = self.ledger.add_entry(food, chrono::Utc::now());
                println!("✓ Logged {}", describe(&entry.food));
            }
            None => println!("Could not identify barcode {}.", code),
        }
    }

    fn cmd_custom(&mut self, args: &str) {
        match parse_custom_args(args) {
            Some((name, macros)) => {
                let food = FoodItem::custom(name, "1 serving", macros);
                let entry = self.ledger.add_entry(food, chrono::Utc::now());
                println!("✓ Logged {}", describe(&entry.food));
            }
            None => {
                println!("Usage: custom <name> <kcal> [protein] [carbs] [fat]");
            }
        }
    }

    fn cmd_list(&self) {
        let today = chrono::Utc::now().date_naive();
        let entries: Vec<_> = self.ledger.entries_for(today).collect();

        if entries.is_empty() {
            println!("No food logged today.");
            return;
        }

        for (i, entry) in entries.iter().enumerate() {
            println!("  {}. {}", i + 1, describe(&entry.food));
        }
    }

    fn cmd_remove(&mut self, arg: &str) {
        let today = chrono::Utc::now().date_naive();
        let ids: Vec<_> = self.ledger.entries_for(today).map(|e| e.id).collect();

        match arg.parse::<usize>() {
            Ok(n) if n >= 1 && n <= ids.len() => {
                self.ledger.remove_entry(ids[n - 1]);
                println!("✓ Removed entry {}", n);
            }
            _ => println!("No entry #{} to remove. Use 'list' to see numbers.", arg),
        }
    }

    fn cmd_water(&mut self) {
        let now = chrono::Utc::now();
        self.ledger.log_water(now, self.water_quantum_ml);
        println!(
            "✓ Water: {:.0} / {:.0} ml",
            self.ledger.water_for(now.date_naive()),
            self.profile.macro_goals.water_ml
        );
    }

    async fn cmd_advice(&mut self) {
        println!("Thinking...");
        match self.advisor.meal_advice(&self.profile).await {
            MealAdvice::Suggestions(text) => {
                println!("\n{}\n", text);
                println!("('dismiss' to clear)");
                self.advice = Some(text);
            }
            MealAdvice::Unavailable => {
                println!("Could not generate meal ideas right now. Try again later.");
            }
        }
    }

    fn cmd_dismiss(&mut self) {
        if self.advice.take().is_some() {
            println!("Advice dismissed.");
        } else {
            println!("No advice to dismiss.");
        }
    }
}

fn describe(food: &FoodItem) -> String {
    let brand = food
        .brand
        .as_deref()
        .map(|b| format!(" ({})", b))
        .unwrap_or_default();
    format!(
        "{}{} — {} — {:.0} kcal, P {:.0}g, C {:.0}g, F {:.0}g",
        food.name,
        brand,
        food.serving_size,
        food.macros.calories,
        food.macros.protein_g,
        food.macros.carbs_g,
        food.macros.fat_g
    )
}

/// Parse `custom` arguments: trailing numbers (up to four, in kcal /
/// protein / carbs / fat order) after the food name. Missing numbers
/// default to zero.
fn parse_custom_args(args: &str) -> Option<(String, MacroBundle)> {
    let tokens: Vec<&str> = args.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    // Longest numeric suffix, capped at four values
    let mut split = tokens.len();
    while split > 0 && tokens[split - 1].parse::<f64>().is_ok() && tokens.len() - split < 4 {
        split -= 1;
    }

    let name = tokens[..split].join(" ");
    if name.is_empty() {
        return None;
    }

    let mut values = [0.0f64; 4];
    for (slot, token) in values.iter_mut().zip(&tokens[split..]) {
        *slot = token.parse().ok()?;
    }

    Some((
        name,
        MacroBundle {
            calories: values[0],
            protein_g: values[1],
            carbs_g: values[2],
            fat_g: values[3],
            water_ml: 0.0,
        },
    ))
}

fn print_help() {
    println!("Commands:");
    println!("  today                    show the dashboard");
    println!("  log <query>              search foods and log one");
    println!("  scan <barcode>           identify a barcode and log it");
    println!("  custom <name> <kcal> [protein] [carbs] [fat]");
    println!("                           log a custom food");
    println!("  list                     list today's entries");
    println!("  remove <n>               remove the n-th listed entry");
    println!("  water                    log one glass of water");
    println!("  advice                   get meal ideas for your goals");
    println!("  dismiss                  clear displayed advice");
    println!("  quit                     end the session");
}
