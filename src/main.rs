use clap::Parser;
use student_buspass::utils::{logger, validation::parse_timestamp, validation::Validate};
use student_buspass::{
    admin_login, catalog, compute_expiry, days_remaining, pass_status, AppConfig, CliConfig,
    Clock, Command, PassError, PassPayload, PassStatus, PlanId, Result, Roster, ScanResult,
    Scanner, SystemClock, DEFAULT_CONFIG_PATH,
};

fn main() {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    let outcome = load_config(&config).and_then(|app_config| run(config.command, &app_config));

    if let Err(e) = outcome {
        tracing::error!("❌ {}", e);
        tracing::debug!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

fn load_config(config: &CliConfig) -> Result<AppConfig> {
    let app_config = match &config.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::from_file_or_default(DEFAULT_CONFIG_PATH)?,
    };
    app_config.validate()?;
    Ok(app_config)
}

fn run(command: Command, app_config: &AppConfig) -> Result<()> {
    let clock = SystemClock;
    let display = &app_config.display;

    match command {
        Command::Plans => {
            for plan in catalog() {
                let mut badges = Vec::new();
                if plan.popular {
                    badges.push("Most Popular");
                }
                if plan.recommended {
                    badges.push("Recommended");
                }
                println!(
                    "{:<10} {:<15} {:<10} ₹{:<5} ≈ ₹{}/day {}",
                    plan.id.as_str(),
                    plan.name,
                    plan.duration,
                    plan.price,
                    plan.per_day_cost(),
                    badges.join(", ")
                );
                if let (Some(original), Some(savings)) = (plan.original_price, plan.savings()) {
                    println!("{:<10} was ₹{}, save ₹{}", "", original, savings);
                }
            }
        }
        Command::Expiry { plan, from, strict } => {
            if strict {
                plan.parse::<PlanId>()?;
            }
            let start = match from {
                Some(ts) => parse_timestamp(&ts)?,
                None => clock.now(),
            };
            let expiry = compute_expiry(&plan, start);
            println!("Plan: {}", PlanId::resolve(&plan).plan().name);
            println!("Valid till: {}", display.format_date(expiry));
            println!("Expiry (UTC): {}", expiry.to_rfc3339());
            println!("Days: {}", days_remaining(Some(expiry), start));
        }
        Command::Status { valid_till } => {
            let valid_till = valid_till.as_deref().map(parse_timestamp).transpose()?;
            let now = clock.now();
            let status = pass_status(valid_till, now);
            match status {
                PassStatus::Active => println!(
                    "✅ Active Pass - {} days left",
                    days_remaining(valid_till, now)
                ),
                PassStatus::Expired => println!("❌ Pass expired"),
                PassStatus::Inactive => println!("No active plan"),
            }
        }
        Command::Pass {
            student_id,
            name,
            school,
            valid_till,
        } => {
            let valid_till = valid_till.as_deref().map(parse_timestamp).transpose()?;
            let payload = PassPayload::new(student_id, name, school, valid_till, clock.now());
            println!("{}", payload.encode()?);
        }
        Command::Scan {
            payload,
            camera,
            json,
        } => {
            let mut scanner = Scanner::new(clock, display.clone(), &app_config.scanner);
            let result = if camera {
                scanner.scan_camera()?
            } else {
                let code = payload.ok_or_else(|| PassError::validation("Please enter a QR code"))?;
                scanner.scan_manual(&code)?
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_scan(&result);
            }
        }
        Command::Students {
            admin_user,
            admin_password,
            search,
            status,
            csv,
        } => {
            let admin = admin_login(&admin_user, &admin_password, &app_config.admin)?;
            tracing::info!("Welcome back, {}!", admin.name);

            let now = clock.now();
            let roster = Roster::mock(now);
            let students = roster.filter(&search, status.map(PassStatus::from), now);

            if csv {
                Roster::write_csv(students, std::io::stdout().lock(), now, display)?;
            } else {
                let stats = roster.stats(now);
                println!(
                    "Total: {}  Active: {}  Expired: {}  Inactive: {}",
                    stats.total, stats.active, stats.expired, stats.inactive
                );
                for s in students {
                    let plan = s.plan_type.map_or("No Plan", |p| p.display_name());
                    let till = s
                        .valid_till
                        .map(|t| {
                            format!(
                                "{} ({} days)",
                                display.format_date(t),
                                days_remaining(Some(t), now)
                            )
                        })
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{:<11} {:<13} {:<20} {:<9} {:<20} {}",
                        s.id,
                        s.name,
                        s.school,
                        plan,
                        till,
                        pass_status(s.valid_till, now)
                    );
                }
            }
        }
    }

    Ok(())
}

fn print_scan(result: &ScanResult) {
    println!(
        "{}",
        if result.valid {
            "✅ PASS VALID"
        } else {
            "❌ PASS INVALID"
        }
    );
    println!("Student Name: {}", result.student_name);
    println!("Student ID:   {}", result.student_id);
    println!("School:       {}", result.school);
    println!("Valid Till:   {}", result.valid_till);
    println!("Scanned at:   {}", result.scan_time);
}
