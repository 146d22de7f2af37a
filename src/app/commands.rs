use crate::app::account::{sign_up, SignupForm};
use crate::app::admin_fleet::AdminFleet;
use crate::app::agent_dashboard::AgentTab;
use crate::app::customer_dashboard::{
    can_cancel, can_review, CarFilter, CustomerTab, IssueType, ReviewOutcome, SearchFilters,
};
use crate::app::App;
use crate::config::args::{AgentCommand, Command, FleetCommand, SearchArgs, SignupArgs};
use crate::core::images::src_for_car;
use crate::core::mappers::{as_list, cars_from, locations_from, CarForm};
use crate::core::routing::Route;
use crate::domain::model::{Booking, Car, UserProfile, WorkItem};
use crate::domain::ports::Dashboard;
use crate::utils::error::Result;
use crate::utils::format::{fmt_datetime, money, money_or_zero};
use chrono::Utc;

/// Runs one CLI command against the API, printing plain-text results to stdout.
pub async fn run(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Login {
            email,
            password,
            no_remember,
        } => {
            let outcome = app.session.login(&email, &password, !no_remember).await?;
            println!("✅ {}", app.session.greeting(&email));
            if let Some(role) = outcome.profile.as_ref().and_then(UserProfile::role) {
                println!("Role: {}", role);
            }
            println!("Dashboard: {}", outcome.landing);
        }
        Command::Logout => {
            app.session.logout()?;
            println!("Signed out.");
        }
        Command::Whoami => whoami(app),
        Command::Signup(args) => signup(app, args).await?,
        Command::Cars { query, fuel, seats } => {
            let cars = cars_from(&app.customer.get_cars().await?);
            let filter = CarFilter { query, fuel, seats };
            let shown = filter.apply(&cars);
            if shown.is_empty() {
                println!("No cars match that filter.");
            }
            for car in shown {
                print_car(car);
            }
        }
        Command::Search(args) => search(app, args).await?,
        Command::Locations => {
            for loc in locations_from(&app.customer.get_locations().await?) {
                println!(
                    "{:>4}  {}",
                    loc.location_id.map(|v| v.to_string()).unwrap_or_default(),
                    loc.location_name
                );
            }
        }
        Command::Quote { car_id, from, to } => {
            let dashboard = app.customer_dashboard()?;
            let mut flow = dashboard.start_booking(&car_with_id(car_id)).with_dates(&from, &to);
            let quote = flow.fetch_quote().await?;
            println!("Days:     {}", quote.days);
            println!("Rate:     {}", money(quote.daily_rate));
            println!("Subtotal: {}", money(quote.subtotal));
            println!("Taxes:    {}", money(quote.taxes));
            println!("Total:    {}", money(quote.total));
        }
        Command::Book {
            car_id,
            from,
            to,
            pickup_location,
            dropoff_location,
        } => {
            let mut dashboard = app.customer_dashboard()?;
            let mut flow = dashboard.start_booking(&car_with_id(car_id)).with_dates(&from, &to);
            flow.set_locations(pickup_location, dropoff_location);
            let created = flow.submit().await?;
            dashboard.on_booked(&created);
            if let Some(quote) = flow.quote() {
                println!("Quoted total: {}", money(quote.total));
            }
            println!("✅ Booked:");
            print_booking(&dashboard.bookings[0]);
        }
        Command::Bookings => {
            let mut dashboard = app.customer_dashboard()?;
            dashboard.load_tab(CustomerTab::Bookings).await?;
            if dashboard.bookings.is_empty() {
                println!("No bookings yet.");
            }
            for booking in &dashboard.bookings {
                print_booking(booking);
            }
        }
        Command::Cancel { booking_id } => {
            let mut dashboard = app.customer_dashboard()?;
            dashboard.cancel_booking(booking_id).await?;
            println!("Booking #{} cancelled.", booking_id);
        }
        Command::Issues => {
            let mut dashboard = app.customer_dashboard()?;
            dashboard.load_tab(CustomerTab::Issues).await?;
            if dashboard.issues.is_empty() {
                println!("No issues reported.");
            }
            for issue in &dashboard.issues {
                println!(
                    "#{:<5} booking #{:<5} {:<8} {:<10} {}",
                    issue.issue_id.map(|v| v.to_string()).unwrap_or_default(),
                    issue.booking_id.map(|v| v.to_string()).unwrap_or_default(),
                    issue.issue_type,
                    issue.status,
                    issue.description
                );
            }
        }
        Command::ReportIssue {
            booking_id,
            issue_type,
            description,
        } => {
            let issue_type: IssueType = issue_type.parse()?;
            let mut dashboard = app.customer_dashboard()?;
            let issue = dashboard
                .report_issue(booking_id, issue_type, &description)
                .await?;
            println!("Issue recorded ({}, {}).", issue.issue_type, issue.status);
        }
        Command::Review {
            booking_id,
            rating,
            comment,
        } => {
            let mut dashboard = app.customer_dashboard()?;
            match dashboard.review(booking_id, rating, &comment).await? {
                ReviewOutcome::Submitted(_) => println!("Thanks for your review!"),
                ReviewOutcome::Disabled => println!("Reviews aren't enabled on this server."),
            }
        }
        Command::Fleet(cmd) => fleet(app, cmd).await?,
        Command::Agent(cmd) => agent(app, cmd).await?,
        Command::Users => {
            app.session.require(Route::AdminDashboard)?;
            let body = app.users.all_users().await?;
            for user in as_list(&body) {
                let profile = UserProfile::new(user.clone());
                println!(
                    "{:>5}  {:<28} {:<12} {}",
                    profile.user_id().unwrap_or_default(),
                    profile.display_name().unwrap_or_default(),
                    profile.role().map(|r| r.to_string()).unwrap_or_default(),
                    profile.email().unwrap_or_default()
                );
            }
        }
    }
    Ok(())
}

fn whoami(app: &App) {
    if !app.session.is_authenticated() {
        println!("Not signed in.");
        return;
    }
    let role = app.session.role();
    println!("{}", app.session.greeting("Customer"));
    println!(
        "Role: {}",
        role.as_ref().map(|r| r.to_string()).unwrap_or_else(|| "—".into())
    );
    if let Some(id) = app.session.user_id() {
        println!("User id: {}", id);
    }
    let links: Vec<&str> = crate::core::routing::nav_items(true, role.as_ref())
        .iter()
        .map(|i| i.label)
        .collect();
    println!("Menu: {}", links.join(" · "));
}

async fn signup(app: &App, args: SignupArgs) -> Result<()> {
    let form = SignupForm {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        phone_number: args.phone,
        password: args.password,
        confirm: args.confirm,
    };
    println!("{}", sign_up(&app.auth, &form).await?);
    Ok(())
}

async fn search(app: &App, args: SearchArgs) -> Result<()> {
    let filters = SearchFilters {
        from: args.from,
        to: args.to,
        brand_id: args.brand_id,
        fuel_type: args.fuel_type,
        transmission: args.transmission,
        min_seats: args.min_seats,
        max_daily_rate: args.max_rate,
    };
    let mut dashboard = app.customer_dashboard()?;
    let cars = dashboard.search(&filters).await?;
    if cars.is_empty() {
        println!("No cars available for those dates.");
    }
    for car in cars {
        print_car(car);
    }
    Ok(())
}

async fn fleet(app: &App, cmd: FleetCommand) -> Result<()> {
    let mut fleet: AdminFleet = app.admin_fleet()?;
    fleet.load_tab(Default::default()).await?;

    match cmd {
        FleetCommand::List { query } => {
            for car in fleet.filtered(&query) {
                print_fleet_row(car);
            }
        }
        FleetCommand::Add(form) => {
            let mut new_car = CarForm {
                transmission: "Automatic".to_string(),
                fuel_type: "Petrol".to_string(),
                ..Default::default()
            };
            overlay(&mut new_car, CarForm::from(form));
            fleet.save_car(None, &new_car).await?;
            println!("Car added. Fleet now has {} cars.", fleet.cars.len());
        }
        FleetCommand::Update { id, form } => {
            // Unset flags keep the car's current values.
            let mut merged = fleet.car(id).map(CarForm::from_car).unwrap_or_default();
            overlay(&mut merged, CarForm::from(form));
            fleet.save_car(Some(id), &merged).await?;
            println!("Car #{} updated.", id);
        }
        FleetCommand::Delete { car_id } => {
            fleet.delete_car(car_id).await?;
            println!("Car #{} deleted.", car_id);
        }
        FleetCommand::Status { car_id, status_id } => {
            fleet.set_car_status(car_id, status_id).await?;
            let name = fleet
                .status_options()
                .into_iter()
                .find(|s| s.status_id == Some(status_id))
                .map(|s| s.status_name)
                .unwrap_or_else(|| status_id.to_string());
            println!("Car #{} is now {}.", car_id, name);
        }
        FleetCommand::Brand { name } => {
            fleet.add_brand(&name).await?;
            println!("Brand added. {} brands known.", fleet.brands.len());
        }
        FleetCommand::Export { out, query } => {
            let count = fleet.export_csv(&query, &out)?;
            println!("Exported {} cars to {}", count, out.display());
        }
    }
    Ok(())
}

fn overlay(base: &mut CarForm, typed: CarForm) {
    let fields = [
        (&mut base.brand_id, typed.brand_id),
        (&mut base.model_name, typed.model_name),
        (&mut base.year, typed.year),
        (&mut base.daily_rate, typed.daily_rate),
        (&mut base.seats, typed.seats),
        (&mut base.transmission, typed.transmission),
        (&mut base.fuel_type, typed.fuel_type),
        (&mut base.status_id, typed.status_id),
        (&mut base.image_url, typed.image_url),
    ];
    for (slot, value) in fields {
        if !value.trim().is_empty() {
            *slot = value;
        }
    }
}

async fn agent(app: &App, cmd: AgentCommand) -> Result<()> {
    let mut dashboard = app.agent_dashboard()?;
    println!("{}", app.session.greeting("Agent"));

    match cmd {
        AgentCommand::Cars => {
            dashboard.load_tab(AgentTab::Cars).await?;
            for car in &dashboard.cars {
                print_car(car);
            }
        }
        AgentCommand::Toggle { car_id } => {
            dashboard.load_tab(AgentTab::Cars).await?;
            let name = dashboard.toggle_availability(car_id).await?;
            println!("Car #{} is now {}.", car_id, name);
        }
        AgentCommand::Issues => {
            dashboard.load_tab(AgentTab::Issues).await?;
            print_work_items(&dashboard.work_items);
        }
        AgentCommand::Maintenance {
            car_id,
            description,
        } => {
            dashboard.create_maintenance(car_id, &description).await?;
            println!("Maintenance request created.");
            print_work_items(&dashboard.work_items);
        }
        AgentCommand::Resolve { request_id } => {
            dashboard.resolve_maintenance(request_id).await?;
            println!("Maintenance request #{} resolved.", request_id);
        }
    }
    Ok(())
}

fn car_with_id(car_id: i64) -> Car {
    Car {
        car_id: Some(car_id),
        ..Default::default()
    }
}

fn opt<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "—".to_string())
}

fn print_car(car: &Car) {
    let status = if car.is_unavailable() {
        "Unavailable".to_string()
    } else if car.status_name.is_empty() {
        "Available".to_string()
    } else {
        car.status_name.clone()
    };
    println!(
        "#{:<4} {:<28} {:>4} {:<9} {:<10} {:>2} seats {:>10}/day  {:<12} {}",
        opt(&car.car_id),
        car.title(),
        opt(&car.year),
        opt(&car.fuel_type),
        opt(&car.transmission),
        opt(&car.seats),
        money(car.daily_rate),
        status,
        src_for_car(car)
    );
}

fn print_fleet_row(car: &Car) {
    println!(
        "#{:<4} {:<16} {:<20} {:>4} {:>10}  {}",
        opt(&car.car_id),
        car.brand_name,
        car.model,
        opt(&car.year),
        money_or_zero(car.daily_rate),
        if car.status_name.is_empty() {
            "—"
        } else {
            car.status_name.as_str()
        }
    );
}

fn print_booking(booking: &Booking) {
    let now = Utc::now();
    let mut actions = Vec::new();
    if can_cancel(booking, now) {
        actions.push("cancel");
    }
    if can_review(booking, now) {
        actions.push("review");
    }
    println!(
        "#{:<5} {:<20} {} → {}  {} → {}  {:>10}  {:<10} {}",
        opt(&booking.booking_id),
        booking.car_name,
        fmt_datetime(booking.pickup_date_time_utc.as_deref()),
        fmt_datetime(booking.dropoff_date_time_utc.as_deref()),
        booking.pickup_location_name,
        booking.dropoff_location_name,
        money(booking.total_amount),
        booking.status_name,
        actions.join(",")
    );
}

fn print_work_items(items: &[WorkItem]) {
    if items.is_empty() {
        println!("No open issues.");
    }
    for item in items {
        println!(
            "{:?} #{:<5} car {:<5} {:<8} {:<9} {}  {}",
            item.kind,
            opt(&item.id),
            opt(&item.car_id),
            item.priority,
            item.status,
            fmt_datetime(Some(item.created_at.as_str())),
            item.description
        );
    }
}
