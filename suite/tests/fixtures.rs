//! Behavior of the harness, sessions and scoped fixtures themselves.
//!
//! These cases assume an empty account, so they only run against the local
//! emulator and return early when a live service is configured.

use petfriends_core::PetForm;
use petfriends_suite::{assets, Harness, Settings, SuiteError};

fn local_harness() -> Result<Option<Harness>, SuiteError> {
    let harness = Harness::start()?;
    Ok(harness.target().is_local().then_some(harness))
}

#[test]
fn first_owned_pet_without_pets_is_precondition_error() -> Result<(), SuiteError> {
    let Some(harness) = local_harness()? else {
        return Ok(());
    };
    let session = harness.session()?;

    let err = session.first_owned_pet().unwrap_err();
    assert!(matches!(err, SuiteError::PreconditionUnmet(_)), "got {err}");
    Ok(())
}

#[test]
fn ensure_owned_pet_creates_when_empty() -> Result<(), SuiteError> {
    let Some(harness) = local_harness()? else {
        return Ok(());
    };
    let session = harness.session()?;

    let pet = session.ensure_owned_pet(
        &PetForm::new("Sylveon", "Pokemon", 2),
        &assets::photo(assets::SYLVEON),
    )?;
    assert_eq!(pet.name, "Sylveon");

    // A second call reuses the existing pet.
    let again = session.ensure_owned_pet(
        &PetForm::new("Other", "Pokemon", 1),
        &assets::photo(assets::SYLVEON),
    )?;
    assert_eq!(again.id, pet.id);
    assert_eq!(session.my_pets()?.len(), 1);
    Ok(())
}

#[test]
fn ensure_owned_pet_fails_when_creation_is_rejected() -> Result<(), SuiteError> {
    let Some(harness) = local_harness()? else {
        return Ok(());
    };
    let session = harness.session()?;

    let err = session
        .ensure_owned_pet(
            &PetForm::new("Sylveon", "Pokemon", -1),
            &assets::photo(assets::SYLVEON),
        )
        .unwrap_err();
    assert!(matches!(err, SuiteError::PreconditionUnmet(msg) if msg.contains("400")));
    Ok(())
}

#[test]
fn owned_pet_is_deleted_on_drop() -> Result<(), SuiteError> {
    let Some(harness) = local_harness()? else {
        return Ok(());
    };
    let session = harness.session()?;

    let id = {
        let fixture = session.acquire_pet(
            &PetForm::new("Eevee", "Pokemon", 3),
            &assets::photo(assets::EEVEE),
        )?;
        assert_eq!(session.my_pets()?.len(), 1);
        fixture.id().to_string()
    };

    assert!(session.my_pets()?.iter().all(|p| p.id != id));
    Ok(())
}

#[test]
fn owned_pet_release_reports_status() -> Result<(), SuiteError> {
    let Some(harness) = local_harness()? else {
        return Ok(());
    };
    let session = harness.session()?;

    let fixture = session.acquire_pet(
        &PetForm::new("Eevee", "Pokemon", 3),
        &assets::photo(assets::EEVEE),
    )?;
    assert_eq!(fixture.pet().name, "Eevee");
    let resp = fixture.release()?;
    assert_eq!(resp.status, 200);
    assert!(session.my_pets()?.is_empty());
    Ok(())
}

#[test]
fn acquire_pet_rejected_is_precondition_error() -> Result<(), SuiteError> {
    let Some(harness) = local_harness()? else {
        return Ok(());
    };
    let session = harness.session()?;

    let err = session
        .acquire_pet(&PetForm::default(), &assets::photo(assets::EEVEE))
        .unwrap_err();
    assert!(matches!(err, SuiteError::PreconditionUnmet(_)));
    Ok(())
}

#[test]
fn wrong_fixture_password_fails_authentication() -> Result<(), SuiteError> {
    let Some(harness) = local_harness()? else {
        return Ok(());
    };

    let err = petfriends_suite::Session::authenticate(
        harness.api(),
        &harness.settings().valid_email,
        &harness.settings().invalid_password,
    )
    .unwrap_err();
    assert!(matches!(err, SuiteError::Authentication { status: 403 }));
    Ok(())
}

#[test]
fn harnesses_do_not_share_state() -> Result<(), SuiteError> {
    let first = Harness::with_settings(Settings::default())?;
    let second = Harness::with_settings(Settings::default())?;
    assert_ne!(first.target().base_url(), second.target().base_url());

    let session = first.session()?;
    let _fixture = session.acquire_pet(
        &PetForm::new("Eevee", "Pokemon", 3),
        &assets::photo(assets::EEVEE),
    )?;
    assert!(second.session()?.my_pets()?.is_empty());
    Ok(())
}

#[test]
fn adopted_pet_is_deleted_on_drop() -> Result<(), SuiteError> {
    let Some(harness) = local_harness()? else {
        return Ok(());
    };
    let session = harness.session()?;

    let resp = harness.api().add_pet_without_photo(
        session.auth_key(),
        &PetForm::new("Raichu", "AlolaPokemon", 5),
    )?;
    let id = {
        let adopted = session
            .adopt(&resp)
            .ok_or_else(|| SuiteError::PreconditionUnmet("no pet created".to_string()))?;
        assert_eq!(adopted.pet().name, "Raichu");
        adopted.id().to_string()
    };

    assert!(session.my_pets()?.iter().all(|p| p.id != id));
    Ok(())
}

#[test]
fn adopt_ignores_rejected_creation() -> Result<(), SuiteError> {
    let Some(harness) = local_harness()? else {
        return Ok(());
    };
    let session = harness.session()?;

    let resp = harness.api().add_pet(
        session.auth_key(),
        &PetForm::new("Eevee", "Pokemon", -3),
        &assets::photo(assets::EEVEE),
    )?;
    assert_eq!(resp.status, 400);
    assert!(session.adopt(&resp).is_none());
    Ok(())
}
