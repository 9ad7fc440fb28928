use bloom_core::*;
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bloom")]
#[command(about = "Personal health signal tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a day record (replaces any existing record for the date)
    Log {
        /// Date to log (yyyy-MM-dd, default today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Mood, 0-4
        #[arg(long)]
        mood: Option<i32>,

        /// Weight
        #[arg(long)]
        weight: Option<f64>,

        /// Body temperature
        #[arg(long)]
        temperature: Option<f64>,

        /// Hours slept
        #[arg(long)]
        sleep: Option<f64>,

        /// Water intake
        #[arg(long)]
        water: Option<f64>,

        /// Energy level, 0-100
        #[arg(long)]
        energy: Option<i32>,

        /// Symptom as name[:intensity[:category]], repeatable
        #[arg(long = "symptom")]
        symptoms: Vec<String>,

        /// Took vitamins today
        #[arg(long)]
        vitamins: bool,

        /// Free-text note
        #[arg(long)]
        note: Option<String>,
    },

    /// Show the record and derived values for a date
    Show {
        /// Date to show (yyyy-MM-dd, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show or configure cycle tracking
    Cycle {
        /// Record a period start date
        #[arg(long)]
        set_start: Option<NaiveDate>,

        /// Set the cycle length in days
        #[arg(long)]
        length: Option<i64>,

        /// Set the menstruation length in days
        #[arg(long)]
        period_length: Option<i64>,
    },

    /// Show or configure pregnancy tracking
    Pregnancy {
        /// Record the pregnancy start date
        #[arg(long)]
        set_start: Option<NaiveDate>,
    },

    /// Switch the active tracking mode and re-register its reminders
    Mode {
        /// Target mode: cycle_tracking, pregnancy or menopause
        goal: String,
    },

    /// List reminder templates for the active mode with next fire times
    Reminders,

    /// Export all day records to a CSV file
    Export {
        /// Output file path
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    bloom_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    std::fs::create_dir_all(&data_dir)?;

    let store_path = bloom_core::store::store_path(&data_dir);
    let mut store = HealthStore::new(JsonFileStore::new(&store_path));

    match cli.command {
        Commands::Log {
            date,
            mood,
            weight,
            temperature,
            sleep,
            water,
            energy,
            symptoms,
            vitamins,
            note,
        } => cmd_log(
            &mut store,
            date.unwrap_or_else(today),
            mood,
            weight,
            temperature,
            sleep,
            water,
            energy,
            symptoms,
            vitamins,
            note,
        ),
        Commands::Show { date } => cmd_show(&store, date.unwrap_or_else(today)),
        Commands::Cycle {
            set_start,
            length,
            period_length,
        } => cmd_cycle(&mut store, set_start, length, period_length),
        Commands::Pregnancy { set_start } => cmd_pregnancy(&mut store, set_start),
        Commands::Mode { goal } => cmd_mode(&mut store, &goal),
        Commands::Reminders => cmd_reminders(&store),
        Commands::Export { out } => cmd_export(&store, &out),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[allow(clippy::too_many_arguments)]
fn cmd_log(
    store: &mut HealthStore<JsonFileStore>,
    date: NaiveDate,
    mood: Option<i32>,
    weight: Option<f64>,
    temperature: Option<f64>,
    sleep: Option<f64>,
    water: Option<f64>,
    energy: Option<i32>,
    symptoms: Vec<String>,
    vitamins: bool,
    note: Option<String>,
) -> Result<()> {
    let mut record = DayRecord::empty(date);
    record.mood = mood.unwrap_or(MOOD_UNSET).clamp(MOOD_UNSET, 4);
    record.weight = weight;
    record.temperature = temperature;
    record.sleep_hours = sleep;
    record.water_intake = water;
    record.energy = energy.map(|e| e.clamp(0, 100));
    record.vitamins = vitamins;
    record.notes = note.unwrap_or_default();
    record.symptoms = symptoms.iter().map(|s| parse_symptom_arg(s)).collect();

    store.save_day_record(&record)?;
    println!("✓ Logged record for {}", date);
    Ok(())
}

/// Parse a `name[:intensity[:category]]` symptom argument
fn parse_symptom_arg(arg: &str) -> SymptomEntry {
    let mut parts = arg.splitn(3, ':');
    let name = parts.next().unwrap_or_default().to_string();
    let intensity = parts
        .next()
        .and_then(|s| s.parse::<u8>().ok())
        .unwrap_or(1)
        .clamp(1, 3);
    let category = parts
        .next()
        .map(bloom_core::codec::parse_symptom_category)
        .unwrap_or(SymptomCategory::Physical);

    SymptomEntry {
        name,
        category,
        intensity,
        notes: String::new(),
    }
}

fn cmd_show(store: &HealthStore<JsonFileStore>, date: NaiveDate) -> Result<()> {
    println!("── {} ──", date);

    match store.day_record(date)? {
        Some(record) => {
            if record.mood != MOOD_UNSET {
                println!("  Mood: {}/4", record.mood);
            }
            if let Some(weight) = record.weight {
                println!("  Weight: {}", weight);
            }
            if let Some(temperature) = record.temperature {
                println!("  Temperature: {}", temperature);
            }
            if let Some(sleep) = record.sleep_hours {
                println!("  Sleep: {} h", sleep);
            }
            if let Some(energy) = record.energy {
                println!("  Energy: {}/100", energy);
            }
            if record.vitamins {
                println!("  Vitamins taken");
            }
            for symptom in &record.symptoms {
                println!("  Symptom: {} (intensity {})", symptom.name, symptom.intensity);
            }
            if !record.notes.is_empty() {
                println!("  Notes: {}", record.notes);
            }
        }
        None => println!("  No record for this date."),
    }

    match store.active_goal()? {
        UserGoal::CycleTracking => {
            if let Some(summary) = cycle::summarize(&store.cycle_config()?, date) {
                print_cycle_summary(&summary);
            }
        }
        UserGoal::Pregnancy => {
            if let Some(snapshot) = pregnancy::summarize(&store.pregnancy_config()?, date) {
                print_pregnancy_snapshot(&snapshot);
            }
        }
        UserGoal::Menopause => {
            if let Some(record) = store.menopause_record(date)? {
                println!("  Menopause symptoms logged: {}", record.symptoms.len());
            }
        }
    }

    Ok(())
}

fn cmd_cycle(
    store: &mut HealthStore<JsonFileStore>,
    set_start: Option<NaiveDate>,
    length: Option<i64>,
    period_length: Option<i64>,
) -> Result<()> {
    let mut config = store.cycle_config()?;
    let mut changed = false;

    if let Some(start) = set_start {
        config.last_period_start = Some(start);
        changed = true;
    }
    if let Some(length) = length {
        config.cycle_length = length;
        changed = true;
    }
    if let Some(period_length) = period_length {
        config.menstruation_length = period_length;
        changed = true;
    }
    if changed {
        store.save_cycle_config(&config)?;
        println!("✓ Cycle configuration updated");
    }

    match cycle::summarize(&config, today()) {
        Some(summary) => print_cycle_summary(&summary),
        None => println!("No period start recorded yet. Use --set-start."),
    }
    Ok(())
}

fn print_cycle_summary(summary: &CycleSummary) {
    println!("  Cycle day: {}", summary.cycle_day_index + 1);
    if summary.in_menstruation {
        println!("  Currently menstruating");
    }
    if summary.in_fertile_window {
        println!("  In the estimated fertile window");
    }
    println!(
        "  Next period expected: {} (in {} days)",
        summary.next_period_start, summary.period_expected_in_days
    );
}

fn cmd_pregnancy(
    store: &mut HealthStore<JsonFileStore>,
    set_start: Option<NaiveDate>,
) -> Result<()> {
    let mut config = store.pregnancy_config()?;

    if let Some(start) = set_start {
        config.start_date = Some(start);
        store.save_pregnancy_config(&config)?;
        println!("✓ Pregnancy start date recorded");
    }

    match pregnancy::summarize(&config, today()) {
        Some(snapshot) => print_pregnancy_snapshot(&snapshot),
        None => println!("No pregnancy start date recorded yet. Use --set-start."),
    }
    Ok(())
}

fn print_pregnancy_snapshot(snapshot: &PregnancySnapshot) {
    println!(
        "  Week {} (trimester {})",
        snapshot.week, snapshot.trimester
    );
    println!(
        "  Baby is about the size of a {} {} ({} cm)",
        snapshot.baby_size.name.to_lowercase(),
        snapshot.baby_size.emoji,
        snapshot.baby_size.size_cm
    );
    if let Some(next) = snapshot.next_size {
        println!(
            "  {:.0}% of the way to {}",
            snapshot.progress_to_next * 100.0,
            next.name.to_lowercase()
        );
    }
    println!("  {}: {}", snapshot.week_info.title, snapshot.week_info.guidance);
    println!("  Estimated due date: {}", snapshot.due_date);
}

fn cmd_mode(store: &mut HealthStore<JsonFileStore>, goal: &str) -> Result<()> {
    let goal = bloom_core::codec::parse_user_goal(goal);

    let previous = store.active_goal()?;
    let mut scheduler = ReminderScheduler::new(LoggingAlarmBackend);
    // Re-activating from the persisted mode keeps the cancel set honest
    scheduler.activate_mode(previous, Utc::now())?;
    scheduler.activate_mode(goal, Utc::now())?;

    store.save_active_goal(goal)?;

    println!("✓ Active mode: {:?}", goal);
    for id in scheduler.scheduled_ids() {
        if let Some(registration) = scheduler.registration(id) {
            println!(
                "  {} → next {} ({})",
                id,
                registration.fire_at.format("%Y-%m-%d %H:%M"),
                scheduler::cadence_label(registration.template.recurrence)
            );
        }
    }
    Ok(())
}

fn cmd_reminders(store: &HealthStore<JsonFileStore>) -> Result<()> {
    let goal = store.active_goal()?;
    let now = Utc::now();

    println!("Reminders for {:?}:", goal);
    for template in catalog::templates_for_mode(goal) {
        let status = if template.enabled { "on " } else { "off" };
        let next = scheduler::next_fire_time(template, now, now);
        println!(
            "  [{}] {:02}:{:02} {} — {} (next {})",
            status,
            template.scheduled_hour,
            template.scheduled_minute,
            scheduler::cadence_label(template.recurrence),
            template.title,
            next.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

fn cmd_export(store: &HealthStore<JsonFileStore>, out: &PathBuf) -> Result<()> {
    let count = export_day_records(store, out)?;
    println!("✓ Exported {} day records to {}", count, out.display());
    Ok(())
}
