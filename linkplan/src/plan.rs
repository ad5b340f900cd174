use crate::options::{LinkSpec, Plan, PlanFormat};
use anyhow::{anyhow, Result};
use log::info;
use registry::{Link, LinkModeEvent, Registry, Tower, TowerId};
use rfgeo::fresnel::max_radius;
use serde::Serialize;
use std::collections::HashMap;

impl Plan {
    pub fn run(&self) -> Result<()> {
        let registry = self.build()?;
        match self.format {
            PlanFormat::Summary => print_summary(&registry),
            PlanFormat::Json => print_json(&registry, self.samples)?,
        };
        Ok(())
    }

    /// Places every tower, then links each pair through link mode.
    ///
    /// Rejected pairs are reported and skipped.
    fn build(&self) -> Result<Registry> {
        let mut registry = Registry::new();
        let mut by_name: HashMap<&str, TowerId> = HashMap::new();

        for tower in &self.towers {
            let id = registry.add_tower(&tower.name, tower.lat, tower.lon, tower.freq_ghz)?;
            if by_name.insert(tower.name.trim(), id).is_some() {
                return Err(anyhow!("duplicate tower name '{}'", tower.name));
            }
        }

        registry.enter_link_mode();
        for LinkSpec(a, b) in &self.links {
            let lookup = |name: &str| {
                by_name
                    .get(name)
                    .ok_or_else(|| anyhow!("no tower named '{name}'"))
            };
            let (a_id, b_id) = (lookup(a.as_str())?, lookup(b.as_str())?);
            registry.click_tower(a_id)?;
            match registry.click_tower(b_id)? {
                LinkModeEvent::Created(id) => info!("{a} ↔ {b}: link {id}"),
                LinkModeEvent::Rejected(reason) => eprintln!("{a} ↔ {b}: rejected, {reason}"),
                LinkModeEvent::Cancelled => eprintln!("{a} ↔ {b}: can't link a tower to itself"),
                _ => (),
            }
        }
        registry.exit_link_mode();
        Ok(registry)
    }
}

fn tower_name<'a>(registry: &'a Registry, id: &TowerId) -> &'a str {
    registry.tower(id).map_or("?", |tower| tower.name())
}

fn print_summary(registry: &Registry) {
    for tower in registry.towers() {
        println!(
            "tower {}: {} at {},{} ({} GHz)",
            tower.id(),
            tower.name(),
            tower.lat(),
            tower.lon(),
            tower.freq_ghz()
        );
    }
    for link in registry.links() {
        let Some(distance_m) = registry.link_distance(link.id()) else {
            continue;
        };
        println!(
            "link {}: {} ↔ {}, {:.1} m, 1st fresnel radius {:.2} m at {} GHz",
            link.id(),
            tower_name(registry, link.tower_a()),
            tower_name(registry, link.tower_b()),
            distance_m,
            max_radius(distance_m, link.freq_ghz()),
            link.freq_ghz()
        );
    }
}

fn print_json(registry: &Registry, samples: usize) -> Result<()> {
    #[derive(Serialize)]
    struct JsonLink<'a> {
        #[serde(flatten)]
        link: &'a Link,
        distance_m: f64,
        max_radius_m: f64,
        scale: f64,
        ring: Vec<[f64; 2]>,
    }

    #[derive(Serialize)]
    struct JsonPlan<'a> {
        towers: &'a [Tower],
        links: Vec<JsonLink<'a>>,
    }

    let links = registry
        .links()
        .iter()
        .filter_map(|link| {
            let envelope = registry.link_envelope(link.id(), samples)?;
            Some(JsonLink {
                link,
                distance_m: envelope.distance_m,
                max_radius_m: envelope.max_radius_m,
                scale: envelope.scale,
                ring: envelope.ring.iter().map(|c| [c.x, c.y]).collect(),
            })
        })
        .collect();

    let json = serde_json::to_string(&JsonPlan {
        towers: registry.towers(),
        links,
    })?;
    println!("{json}");
    Ok(())
}
