use combat_core::{
    Ability, AbilityEffect, CombatSession, CombatStatus, EffectApplication, EntityId, Hero,
    HostileData, PcgRng, Protagonist, RngSource, ScriptedRng, StatusEffectKind,
};

fn hero() -> Hero {
    Hero::new("Aria", 3, 40, 20)
        .with_stats(14, 12, 25)
        .with_weapon("1d8".parse().unwrap())
        .with_abilities(vec![
            Ability::new("nova", "Frost Nova", AbilityEffect::AreaDamage { power: 100 })
                .with_cost(8, 2),
        ])
}

fn goblin(id: u32, speed: u32) -> HostileData {
    HostileData::new(EntityId(id), format!("Goblin {id}"), 20)
        .with_attack(8)
        .with_defense(10)
        .with_speed(speed)
        .with_challenge_rating(0.5)
        .with_experience(50)
}

/// Minimal host loop: tick effects, act unless incapacitated, advance.
fn play<R: RngSource>(session: &mut CombatSession<'_, Hero, R>) {
    for _ in 0..500 {
        assert_eq!(
            session.state().turn_order.len(),
            1 + session.remaining_hostiles().len()
        );
        if session.is_over() {
            return;
        }
        if let Some(entry) = session.current_turn() {
            let id = entry.combatant;
            let tick = session.process_status_effects(id);
            if !session.is_over() && !tick.died && !tick.incapacitated {
                if id.is_player() {
                    let target = session.remaining_hostiles()[0].id;
                    session.player_attack(target).unwrap();
                } else {
                    session.enemy_attack(id).unwrap();
                }
            }
        }
        session.next_turn();
    }
}

#[test]
fn faster_hostile_opens_and_rounds_wrap() {
    let mut hero = hero();
    let mut session = CombatSession::new(&mut hero, &[goblin(1, 30)], PcgRng::seeded(3)).unwrap();

    let order: Vec<_> = session.combatants().iter().map(|c| c.id).collect();
    assert_eq!(order, vec![EntityId(1), EntityId::PLAYER]);
    assert_eq!(session.current_turn().map(|e| e.combatant), Some(EntityId(1)));
    assert_eq!(session.round(), 1);

    assert_eq!(session.next_turn().map(|e| e.combatant), Some(EntityId::PLAYER));
    assert_eq!(session.round(), 1);
    assert_eq!(session.next_turn().map(|e| e.combatant), Some(EntityId(1)));
    assert_eq!(session.round(), 2);
    assert_eq!(session.log_entries().last().map(String::as_str), Some("--- Round 2 ---"));
}

#[test]
fn same_seed_replays_the_same_encounter() {
    let hostiles = [goblin(1, 30), goblin(2, 10)];

    let mut first_hero = hero();
    let mut first = CombatSession::new(&mut first_hero, &hostiles, PcgRng::seeded(42)).unwrap();
    play(&mut first);

    let mut second_hero = hero();
    let mut second = CombatSession::new(&mut second_hero, &hostiles, PcgRng::seeded(42)).unwrap();
    play(&mut second);

    assert!(first.is_over());
    assert_eq!(first.status(), second.status());
    assert_eq!(first.round(), second.round());
    assert_eq!(first.log_entries(), second.log_entries());
    assert_eq!(first.protagonist().health(), second.protagonist().health());
}

#[test]
fn multi_kill_keeps_the_turn_cursor_on_track() {
    // order: 1 (30), P (25), 2 (20), 3 (10)
    let mut hero = Hero::new("Aria", 3, 40, 20)
        .with_stats(10, 12, 25)
        .with_abilities(vec![
            Ability::new("nova", "Frost Nova", AbilityEffect::AreaDamage { power: 100 }),
        ]);
    let hostiles = [
        goblin(1, 30).with_health(5),
        goblin(2, 20).with_health(8),
        goblin(3, 10),
    ];
    // unarmed 1d4 = 3, + 10/2
    let mut session =
        CombatSession::new(&mut hero, &hostiles, ScriptedRng::die_faces(&[3])).unwrap();
    assert_eq!(session.next_turn().map(|e| e.combatant), Some(EntityId::PLAYER));

    // kills one combatant before and one after the acting slot
    let result = session.use_ability("nova", None);
    assert_eq!(result.killed, vec![EntityId(1), EntityId(2)]);
    assert_eq!(session.current_turn().map(|e| e.combatant), Some(EntityId::PLAYER));

    assert_eq!(session.next_turn().map(|e| e.combatant), Some(EntityId(3)));
    assert_eq!(session.round(), 1);
    assert_eq!(session.next_turn().map(|e| e.combatant), Some(EntityId::PLAYER));
    assert_eq!(session.round(), 2);
    assert_eq!(session.experience_earned(), 100);
}

#[test]
fn killing_the_acting_first_slot_resumes_at_the_new_first_slot() {
    // order: 1 (30), P (25), 2 (10); goblin 1 is acting and dies to its own poison
    let mut hero = hero();
    let hostiles = [goblin(1, 30).with_health(2), goblin(2, 10)];
    let mut session = CombatSession::new(&mut hero, &hostiles, PcgRng::seeded(9)).unwrap();
    session.apply_status_effect(
        EntityId(1),
        EffectApplication::new(StatusEffectKind::Poison, 3).with_value(4),
    );

    let tick = session.process_status_effects(EntityId(1));
    assert!(tick.died);
    assert!(session.current_turn().is_none());
    assert_eq!(session.next_turn().map(|e| e.combatant), Some(EntityId::PLAYER));
    assert_eq!(session.round(), 1);
}

#[test]
fn unknown_combatants_are_contract_errors() {
    let mut hero = hero();
    let mut session = CombatSession::new(&mut hero, &[goblin(1, 5)], PcgRng::seeded(1)).unwrap();
    assert!(session.player_attack(EntityId(99)).is_err());
    assert!(session.enemy_attack(EntityId(99)).is_err());
    assert!(session.process_status_effects(EntityId(99)).processed.is_empty());
    assert_eq!(session.status(), CombatStatus::InProgress);
}

#[test]
fn fleeing_ends_the_encounter_without_experience() {
    let mut hero = hero();
    let mut session = CombatSession::new(&mut hero, &[goblin(1, 5)], PcgRng::seeded(1)).unwrap();
    assert!(session.flee());
    assert_eq!(session.status(), CombatStatus::Fled);
    assert_eq!(session.experience_earned(), 0);
    assert!(session.current_turn().is_none());
    assert_eq!(
        session.log_entries().last().map(String::as_str),
        Some("Aria flees from combat!")
    );
}

#[test]
fn session_works_through_a_trait_object() {
    let mut hero = hero();
    let protagonist: &mut dyn Protagonist = &mut hero;
    let mut session =
        CombatSession::new(protagonist, &[goblin(1, 5)], PcgRng::seeded(5)).unwrap();
    session.player_attack(EntityId(1)).unwrap();
    assert_eq!(session.protagonist().name(), "Aria");
}

#[cfg(feature = "serde")]
#[test]
fn state_snapshot_serializes() {
    let mut hero = hero();
    let session = CombatSession::new(&mut hero, &[goblin(1, 5)], PcgRng::seeded(1)).unwrap();
    let json = serde_json::to_string(session.state()).unwrap();
    let back: combat_core::CombatState = serde_json::from_str(&json).unwrap();
    assert_eq!(&back, session.state());
}
