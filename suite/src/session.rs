//! Authenticated workflows and the fixtures test cases build on.
//!
//! A [`Session`] is the `AUTHENTICATED` state of a test case: it holds the
//! API key obtained from the valid fixtures and offers the precondition
//! steps (`first_owned_pet`, `ensure_owned_pet`) and scoped pet acquisition
//! ([`OwnedPet`]). Nothing here caches state between test cases.

use std::path::Path;

use petfriends_core::{ApiResponse, Pet, PetFilter, PetForm, PetFriends};
use tracing::{debug, info, warn};

use crate::error::SuiteError;

#[derive(Debug)]
pub struct Session<'a> {
    api: &'a PetFriends,
    auth_key: String,
}

impl<'a> Session<'a> {
    /// Obtain an API key for `email`/`password`.
    ///
    /// # Errors
    /// [`SuiteError::Authentication`] if the service does not answer 200
    /// with a non-empty `key`.
    pub fn authenticate(api: &'a PetFriends, email: &str, password: &str) -> Result<Self, SuiteError> {
        let resp = api.get_api_key(email, password)?;
        match resp.str_field("key") {
            Some(key) if resp.is_ok() && !key.is_empty() => {
                debug!(%email, "authenticated");
                Ok(Self {
                    api,
                    auth_key: key.to_string(),
                })
            }
            _ => Err(SuiteError::Authentication { status: resp.status }),
        }
    }

    pub fn api(&self) -> &'a PetFriends {
        self.api
    }

    pub fn auth_key(&self) -> &str {
        &self.auth_key
    }

    /// The caller's pets, newest first as the service orders them.
    ///
    /// # Errors
    /// Fails if the call fails or the listing has no `pets` sequence.
    pub fn my_pets(&self) -> Result<Vec<Pet>, SuiteError> {
        let resp = self.api.list_pets(&self.auth_key, PetFilter::MyPets)?;
        Ok(resp.pets()?)
    }

    /// First owned pet, or a hard precondition error when there is none.
    ///
    /// # Errors
    /// [`SuiteError::PreconditionUnmet`] when the caller owns no pets.
    pub fn first_owned_pet(&self) -> Result<Pet, SuiteError> {
        self.my_pets()?
            .into_iter()
            .next()
            .ok_or_else(|| SuiteError::PreconditionUnmet("there are no owned pets".to_string()))
    }

    /// First owned pet, creating one from `form` and `photo` if the caller
    /// owns none. The created pet is not cleaned up.
    ///
    /// # Errors
    /// [`SuiteError::PreconditionUnmet`] when the list is still empty after
    /// the creation attempt.
    pub fn ensure_owned_pet(&self, form: &PetForm, photo: &Path) -> Result<Pet, SuiteError> {
        if let Some(pet) = self.my_pets()?.into_iter().next() {
            return Ok(pet);
        }
        info!(name = ?form.name, "no owned pets, creating one");
        let created = self.api.add_pet(&self.auth_key, form, photo)?;
        self.my_pets()?.into_iter().next().ok_or_else(|| {
            SuiteError::PreconditionUnmet(format!(
                "no owned pets and creating one answered HTTP {}",
                created.status
            ))
        })
    }

    /// Create a pet that is deleted again when the guard is released or
    /// dropped.
    ///
    /// # Errors
    /// [`SuiteError::PreconditionUnmet`] if the service does not create it.
    pub fn acquire_pet(&self, form: &PetForm, photo: &Path) -> Result<OwnedPet<'a>, SuiteError> {
        let resp = self.api.add_pet(&self.auth_key, form, photo)?;
        if !resp.is_ok() {
            return Err(SuiteError::PreconditionUnmet(format!(
                "creating a fixture pet answered HTTP {}",
                resp.status
            )));
        }
        let pet: Pet = resp.json()?;
        debug!(pet_id = %pet.id, "fixture pet acquired");
        Ok(self.guard(pet))
    }

    /// Take ownership of a pet a test case created itself, so a failing
    /// assertion still deletes it. `None` when `resp` did not create a pet.
    pub fn adopt(&self, resp: &ApiResponse) -> Option<OwnedPet<'a>> {
        if !resp.is_ok() {
            return None;
        }
        resp.json::<Pet>().ok().map(|pet| self.guard(pet))
    }

    fn guard(&self, pet: Pet) -> OwnedPet<'a> {
        OwnedPet {
            api: self.api,
            auth_key: self.auth_key.clone(),
            pet,
            released: false,
        }
    }
}

/// Scoped fixture pet. Deleted on [`OwnedPet::release`] or drop.
#[derive(Debug)]
pub struct OwnedPet<'a> {
    api: &'a PetFriends,
    auth_key: String,
    pet: Pet,
    released: bool,
}

impl OwnedPet<'_> {
    pub fn pet(&self) -> &Pet {
        &self.pet
    }

    pub fn id(&self) -> &str {
        &self.pet.id
    }

    /// Delete the pet now and report the service's answer.
    ///
    /// # Errors
    /// Fails only if the delete call itself fails.
    pub fn release(mut self) -> Result<ApiResponse, SuiteError> {
        self.released = true;
        Ok(self.api.delete_pet(&self.auth_key, &self.pet.id)?)
    }
}

impl Drop for OwnedPet<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match self.api.delete_pet(&self.auth_key, &self.pet.id) {
            Ok(resp) if resp.is_ok() => debug!(pet_id = %self.pet.id, "fixture pet released"),
            Ok(resp) => warn!(pet_id = %self.pet.id, status = resp.status, "fixture pet cleanup refused"),
            Err(e) => warn!(pet_id = %self.pet.id, error = %e, "fixture pet cleanup failed"),
        }
    }
}
