use dialoguer::MultiSelect;

use crate::timetable::models::Lesson;

const DISCLAIMER: &str = "(выбор ПРОБЕЛОМ, ENTER для подтверждения)";

/// Subjects left out of the calendar
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Exclusion {
    /// Keep everything, an empty list included
    #[default]
    Nothing,
    One(String),
    Many(Vec<String>),
}

impl Exclusion {
    /// Build from the values given by the user
    pub fn from_values(mut values: Vec<String>) -> Self {
        match values.len() {
            0 => Self::Nothing,
            1 => Self::One(values.remove(0)),
            _ => Self::Many(values),
        }
    }

    /// True if the lesson stays in the calendar
    pub fn keeps(&self, lesson: &Lesson) -> bool {
        match self {
            Self::Nothing => true,
            Self::One(name) => *name != lesson.name,
            Self::Many(names) => !names.contains(&lesson.name),
        }
    }

    fn names(&self) -> &[String] {
        match self {
            Self::Nothing => &[],
            Self::One(name) => std::slice::from_ref(name),
            Self::Many(names) => names,
        }
    }
}

/// Drop the excluded lessons, keeping the order of the others
pub fn lessons(lessons: Vec<Lesson>, exclusion: &Exclusion) -> Vec<Lesson> {
    lessons
        .into_iter()
        .filter(|lesson| exclusion.keeps(lesson))
        .collect()
}

/// Ask which subjects to follow, every unchecked subject is excluded
///
/// # Errors
///
/// Fails when the terminal can't be used
pub fn interactive(lessons: &[Lesson], exclusion: &Exclusion) -> dialoguer::Result<Exclusion> {
    let mut multiselected: Vec<String> = vec![];
    for lesson in lessons {
        if !multiselected.contains(&lesson.name) {
            multiselected.push(lesson.name.clone());
        }
    }

    let excluded = exclusion.names();
    let defaults: Vec<bool> = multiselected
        .iter()
        .map(|name| !excluded.contains(name))
        .collect();

    let selections = MultiSelect::new()
        .with_prompt(format!("Выбери свои предметы {DISCLAIMER}"))
        .items(&multiselected[..])
        .defaults(&defaults[..])
        .interact()?;

    let not_followed = multiselected
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !selections.contains(i))
        .map(|(_, name)| name)
        .collect();

    Ok(Exclusion::from_values(not_followed))
}
