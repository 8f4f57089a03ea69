use super::*;
use crate::util::fnv1a64;

pub(super) fn turret_bot_configs() -> &'static [TurretConfig] {
    &[
        TurretConfig {
            id: "turret",
            description: "Stands still, aims at the nearest asteroid and fires every other frame.",
            fire_period: 2,
            fire_range: 450.0,
            turn_tolerance: 0.05,
        },
        TurretConfig {
            id: "turret-sniper",
            description: "Stationary turret that holds fire until targets are close.",
            fire_period: 6,
            fire_range: 220.0,
            turn_tolerance: 0.03,
        },
    ]
}

pub(super) fn dodger_bot_configs() -> &'static [DodgerConfig] {
    &[
        DodgerConfig {
            id: "dodger",
            description: "Turret that strafes off close threat lines and blinks out of contact.",
            fire_period: 2,
            fire_range: 450.0,
            turn_tolerance: 0.05,
            threat_radius: 140.0,
            blink_radius: 60.0,
            edge_margin: 90.0,
        },
        DodgerConfig {
            id: "dodger-wary",
            description: "Dodger with a wider threat bubble and earlier blinks.",
            fire_period: 3,
            fire_range: 380.0,
            turn_tolerance: 0.05,
            threat_radius: 200.0,
            blink_radius: 90.0,
            edge_margin: 120.0,
        },
    ]
}

pub fn bot_ids() -> Vec<&'static str> {
    let mut ids = vec!["idle"];
    ids.extend(turret_bot_configs().iter().map(|cfg| cfg.id));
    ids.extend(dodger_bot_configs().iter().map(|cfg| cfg.id));
    ids
}

pub fn describe_bots() -> Vec<(&'static str, &'static str)> {
    let mut out = vec![(IdleBot.id(), IdleBot.description())];
    out.extend(
        turret_bot_configs()
            .iter()
            .map(|cfg| (cfg.id, cfg.description)),
    );
    out.extend(
        dodger_bot_configs()
            .iter()
            .map(|cfg| (cfg.id, cfg.description)),
    );
    out
}

pub fn create_bot(id: &str) -> Option<Box<dyn AutopilotBot + Send>> {
    if id == "idle" {
        return Some(Box::new(IdleBot));
    }
    if let Some(cfg) = turret_bot_configs().iter().find(|cfg| cfg.id == id) {
        return Some(Box::new(TurretBot::new(*cfg)));
    }
    if let Some(cfg) = dodger_bot_configs().iter().find(|cfg| cfg.id == id) {
        return Some(Box::new(DodgerBot::new(*cfg)));
    }
    None
}

fn hash_json(value: &serde_json::Value) -> String {
    let encoded = serde_json::to_vec(value).unwrap_or_default();
    format!("fnv1a:{:016x}:len:{}", fnv1a64(&encoded), encoded.len())
}

fn entry<T: Serialize>(id: &str, family: &str, description: &str, cfg: &T) -> BotManifestEntry {
    let config = serde_json::to_value(cfg).unwrap_or(serde_json::Value::Null);
    BotManifestEntry {
        id: id.to_string(),
        family: family.to_string(),
        description: description.to_string(),
        config_hash: hash_json(&config),
        config,
    }
}

pub fn bot_manifest_entries() -> Vec<BotManifestEntry> {
    let mut out = vec![entry(
        IdleBot.id(),
        "idle",
        IdleBot.description(),
        &serde_json::json!({ "id": IdleBot.id() }),
    )];
    for cfg in turret_bot_configs() {
        out.push(entry(cfg.id, "turret", cfg.description, cfg));
    }
    for cfg in dodger_bot_configs() {
        out.push(entry(cfg.id, "dodger", cfg.description, cfg));
    }
    out
}

pub fn bot_fingerprint(id: &str) -> Option<String> {
    bot_manifest_entries()
        .into_iter()
        .find(|entry| entry.id == id)
        .map(|entry| entry.config_hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_listed_bot_can_be_created() {
        for id in bot_ids() {
            let bot = create_bot(id).unwrap_or_else(|| panic!("missing bot {id}"));
            assert_eq!(bot.id(), id);
        }
        assert!(create_bot("no-such-bot").is_none());
    }

    #[test]
    fn ids_are_unique_and_described() {
        let ids = bot_ids();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert_eq!(describe_bots().len(), ids.len());
    }

    #[test]
    fn fingerprints_are_stable_and_distinct() {
        let turret = bot_fingerprint("turret").expect("turret fingerprint");
        assert_eq!(bot_fingerprint("turret"), Some(turret.clone()));
        assert_ne!(bot_fingerprint("turret-sniper"), Some(turret));
        assert!(bot_fingerprint("unknown").is_none());
        assert_eq!(bot_manifest_entries().len(), bot_ids().len());
    }
}
