use serde::Deserialize;

use super::repo_types::{CourseUpdate, MinimumSkill, NewCourse};
use crate::{error::AppError, validation};

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub weeks: Option<i32>,
    pub tuition: Option<f64>,
    pub minimum_skill: Option<MinimumSkill>,
    #[serde(default)]
    pub scholarship_available: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub weeks: Option<i32>,
    pub tuition: Option<f64>,
    pub minimum_skill: Option<MinimumSkill>,
    pub scholarship_available: Option<bool>,
}

fn check_weeks(weeks: i32) -> Result<i32, AppError> {
    if weeks < 1 {
        return Err(AppError::Validation("Number of weeks must be positive".into()));
    }
    Ok(weeks)
}

fn check_tuition(tuition: f64) -> Result<f64, AppError> {
    if !tuition.is_finite() || tuition < 0.0 {
        return Err(AppError::Validation("Tuition can not be negative".into()));
    }
    Ok(tuition)
}

impl CreateCourseRequest {
    pub fn validate(self) -> Result<NewCourse, AppError> {
        validation::required("course title", &self.title, None)?;
        validation::required("description", &self.description, None)?;
        let weeks = self
            .weeks
            .ok_or_else(|| AppError::Validation("Please add number of weeks".into()))
            .and_then(check_weeks)?;
        let tuition = self
            .tuition
            .ok_or_else(|| AppError::Validation("Please add a tuition cost".into()))
            .and_then(check_tuition)?;
        let minimum_skill = self
            .minimum_skill
            .ok_or_else(|| AppError::Validation("Please add a minimum skill".into()))?;

        Ok(NewCourse {
            title: self.title.trim().to_string(),
            description: self.description,
            weeks,
            tuition,
            minimum_skill,
            scholarship_available: self.scholarship_available,
        })
    }
}

impl UpdateCourseRequest {
    pub fn validate(self) -> Result<CourseUpdate, AppError> {
        if let Some(title) = &self.title {
            validation::required("course title", title, None)?;
        }
        if let Some(description) = &self.description {
            validation::required("description", description, None)?;
        }
        Ok(CourseUpdate {
            title: self.title.map(|t| t.trim().to_string()),
            description: self.description,
            weeks: self.weeks.map(check_weeks).transpose()?,
            tuition: self.tuition.map(check_tuition).transpose()?,
            minimum_skill: self.minimum_skill,
            scholarship_available: self.scholarship_available,
        })
    }
}
