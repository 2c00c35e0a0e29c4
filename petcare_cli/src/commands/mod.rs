//! Subcommand handlers. Everything here goes through the dashboard controller.

use anyhow::anyhow;
use petcare_core::{
    filter_pets, stat_percentage, stat_value, CapabilityTier, Dashboard, Navigator,
    PopulationStats,
};
use petcare_http::{GatewayError, PetAction, PetId, PetRequest, PetResponse};
use tracing::info;

const BAR_WIDTH: usize = 20;

/// Terminal stand-in for returning to the sign-in screen.
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn to_entry(&self) {
        println!("Signed out. Run `petcare login <username> <password>` to continue.");
    }
}

fn surface(err: GatewayError) -> anyhow::Error {
    anyhow!(err.message())
}

pub async fn register(dashboard: &Dashboard, username: &str, password: &str) -> anyhow::Result<()> {
    let identity = dashboard.sign_up(username, password).await.map_err(surface)?;
    println!("Account created. Welcome, {}!", identity.username);
    Ok(())
}

pub async fn login(dashboard: &Dashboard, username: &str, password: &str) -> anyhow::Result<()> {
    let identity = dashboard.sign_in(username, password).await.map_err(surface)?;
    println!("Welcome, {}!", identity.username);
    Ok(())
}

pub fn whoami(dashboard: &Dashboard) -> anyhow::Result<()> {
    let session = dashboard.session();
    match (session.identity(), session.tier()) {
        (Some(identity), Some(tier)) => {
            let roles: Vec<&str> = identity.roles.iter().map(String::as_str).collect();
            println!(
                "{} [{}] ({})",
                identity.username,
                roles.join(", "),
                tier_label(tier)
            );
        }
        _ => println!("Not signed in."),
    }
    Ok(())
}

pub async fn list(dashboard: &Dashboard, search: Option<&str>) -> anyhow::Result<()> {
    ensure_signed_in(dashboard)?;
    let pets = dashboard.refresh().await.map_err(surface)?;
    let shown = filter_pets(&pets, search.unwrap_or(""));
    if shown.is_empty() {
        println!("No pets yet.");
        return Ok(());
    }
    let show_owner = is_admin(dashboard);
    for pet in shown {
        print_pet(pet, show_owner);
    }
    Ok(())
}

pub async fn stats(dashboard: &Dashboard) -> anyhow::Result<()> {
    ensure_signed_in(dashboard)?;
    let pets = dashboard.refresh().await.map_err(surface)?;
    let stats = PopulationStats::from_pets(&pets);
    println!("Pets:            {}", stats.total);
    println!("Owners:          {}", stats.owners);
    println!("Average health:  {}%", stats.avg_health);
    println!("Average mood:    {}%", stats.avg_happiness);
    Ok(())
}

pub async fn create(dashboard: &Dashboard, name: String, species: String) -> anyhow::Result<()> {
    let request = pet_request(name, species)?;
    let pets = dashboard.create(&request).await.map_err(surface)?;
    println!("{} joined the family. You now see {} pet(s).", request.name, pets.len());
    Ok(())
}

pub async fn update(
    dashboard: &Dashboard,
    id: PetId,
    name: String,
    species: String,
) -> anyhow::Result<()> {
    let request = pet_request(name, species)?;
    dashboard.update(id, &request).await.map_err(surface)?;
    println!("Pet {} updated.", id);
    Ok(())
}

pub async fn care(dashboard: &Dashboard, id: PetId, action: PetAction) -> anyhow::Result<()> {
    if is_admin(dashboard) {
        return Err(anyhow!("Care actions are disabled in management mode"));
    }
    let pets = dashboard.act(id, action).await.map_err(surface)?;
    info!("{} on pet {}", action, id);
    match pets.iter().find(|p| p.id == id) {
        Some(pet) => print_pet(pet, false),
        None => println!("Done."),
    }
    Ok(())
}

pub async fn delete(dashboard: &Dashboard, id: PetId) -> anyhow::Result<()> {
    let pets = dashboard.delete(id).await.map_err(surface)?;
    println!("Pet {} deleted. {} pet(s) left.", id, pets.len());
    Ok(())
}

fn ensure_signed_in(dashboard: &Dashboard) -> anyhow::Result<()> {
    if dashboard.session().is_authenticated() {
        Ok(())
    } else {
        Err(anyhow!("Not signed in"))
    }
}

fn is_admin(dashboard: &Dashboard) -> bool {
    dashboard.session().tier().is_some_and(CapabilityTier::is_admin)
}

fn tier_label(tier: CapabilityTier) -> &'static str {
    match tier {
        CapabilityTier::Administrative => "administrator",
        CapabilityTier::Standard => "standard",
    }
}

/// The dashboard refuses to submit a form with a blank name or species.
fn pet_request(name: String, species: String) -> anyhow::Result<PetRequest> {
    let name = name.trim().to_string();
    let species = species.trim().to_lowercase();
    if name.is_empty() || species.is_empty() {
        return Err(anyhow!("Name and species are required"));
    }
    Ok(PetRequest::new(name, species))
}

fn print_pet(pet: &PetResponse, show_owner: bool) {
    if show_owner {
        println!("#{} {} ({}) owned by {}", pet.id, pet.name, pet.species, pet.owner_username);
    } else {
        println!("#{} {} ({})", pet.id, pet.name, pet.species);
    }
    for (label, stat) in [
        ("Hunger", &pet.hunger),
        ("Happiness", &pet.happiness),
        ("Energy", &pet.energy),
        ("Health", &pet.health),
    ] {
        println!(
            "  {:<10} {} {:>5}/100",
            label,
            bar(stat_value(stat)),
            stat.to_string()
        );
    }
}

fn bar(value: f64) -> String {
    let filled = stat_percentage(value, 100.0) as usize * BAR_WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}
