use serde::Deserialize;

use super::repo_types::{BootcampUpdate, NewBootcamp};
use crate::{error::AppError, validation};

pub const CAREERS: &[&str] = &[
    "Web Development",
    "Mobile Development",
    "UI/UX",
    "Data Science",
    "Business",
    "Other",
];

const NAME_MAX: usize = 50;
const DESCRIPTION_MAX: usize = 500;
const PHONE_MAX: usize = 20;

#[derive(Debug, Deserialize)]
pub struct CreateBootcampRequest {
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: String,
    #[serde(default)]
    pub careers: Vec<String>,
    #[serde(default)]
    pub housing: bool,
    #[serde(default)]
    pub job_assistance: bool,
    #[serde(default)]
    pub job_guarantee: bool,
    #[serde(default)]
    pub accept_gi: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateBootcampRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub careers: Option<Vec<String>>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    pub accept_gi: Option<bool>,
}

fn check_contact(
    website: Option<&str>,
    phone: Option<&str>,
    email: Option<&str>,
) -> Result<(), AppError> {
    if let Some(w) = website {
        if !validation::is_valid_url(w) {
            return Err(AppError::Validation(
                "Please use a valid URL with HTTP or HTTPS".into(),
            ));
        }
    }
    if let Some(p) = phone {
        if p.chars().count() > PHONE_MAX {
            return Err(AppError::Validation(format!(
                "Phone number can not be longer than {PHONE_MAX} characters"
            )));
        }
    }
    if let Some(e) = email {
        validation::email(e)?;
    }
    Ok(())
}

fn check_careers(careers: &[String]) -> Result<(), AppError> {
    match careers.iter().find(|c| !CAREERS.contains(&c.as_str())) {
        Some(bad) => Err(AppError::Validation(format!("Unknown career {bad:?}"))),
        None => Ok(()),
    }
}

impl CreateBootcampRequest {
    pub fn validate(self) -> Result<NewBootcamp, AppError> {
        validation::required("name", &self.name, Some(NAME_MAX))?;
        validation::required("description", &self.description, Some(DESCRIPTION_MAX))?;
        validation::required("address", &self.address, None)?;
        let email = self.email.map(|e| validation::normalize_email(&e));
        check_contact(self.website.as_deref(), self.phone.as_deref(), email.as_deref())?;
        check_careers(&self.careers)?;

        Ok(NewBootcamp {
            name: self.name.trim().to_string(),
            description: self.description,
            website: self.website,
            phone: self.phone,
            email,
            address: self.address,
            careers: self.careers,
            housing: self.housing,
            job_assistance: self.job_assistance,
            job_guarantee: self.job_guarantee,
            accept_gi: self.accept_gi,
        })
    }
}

impl UpdateBootcampRequest {
    pub fn validate(self) -> Result<BootcampUpdate, AppError> {
        if let Some(name) = &self.name {
            validation::required("name", name, Some(NAME_MAX))?;
        }
        if let Some(description) = &self.description {
            validation::required("description", description, Some(DESCRIPTION_MAX))?;
        }
        if let Some(address) = &self.address {
            validation::required("address", address, None)?;
        }
        let email = self.email.map(|e| validation::normalize_email(&e));
        check_contact(self.website.as_deref(), self.phone.as_deref(), email.as_deref())?;
        if let Some(careers) = &self.careers {
            check_careers(careers)?;
        }

        Ok(BootcampUpdate {
            name: self.name.map(|n| n.trim().to_string()),
            description: self.description,
            website: self.website,
            phone: self.phone,
            email,
            address: self.address,
            careers: self.careers,
            housing: self.housing,
            job_assistance: self.job_assistance,
            job_guarantee: self.job_guarantee,
            accept_gi: self.accept_gi,
        })
    }
}
