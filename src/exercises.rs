//! Preset catalog - exercises and muscles loaded into a fresh database

use serde::{Deserialize, Serialize};

/// Muscles known to the preset catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MuscleGroup {
    Chest,
    FrontDelts,
    SideDelts,
    RearDelts,
    Triceps,
    Biceps,
    Forearms,
    Lats,
    Traps,
    UpperBack,
    LowerBack,
    Abs,
    Obliques,
    Glutes,
    Quads,
    Hamstrings,
    Calves,
    Adductors,
}

impl MuscleGroup {
    /// Name as stored in the Muscles table
    pub fn name(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "Chest",
            MuscleGroup::FrontDelts => "Front Delts",
            MuscleGroup::SideDelts => "Side Delts",
            MuscleGroup::RearDelts => "Rear Delts",
            MuscleGroup::Triceps => "Triceps",
            MuscleGroup::Biceps => "Biceps",
            MuscleGroup::Forearms => "Forearms",
            MuscleGroup::Lats => "Lats",
            MuscleGroup::Traps => "Traps",
            MuscleGroup::UpperBack => "Upper Back",
            MuscleGroup::LowerBack => "Lower Back",
            MuscleGroup::Abs => "Abs",
            MuscleGroup::Obliques => "Obliques",
            MuscleGroup::Glutes => "Glutes",
            MuscleGroup::Quads => "Quadriceps",
            MuscleGroup::Hamstrings => "Hamstrings",
            MuscleGroup::Calves => "Calves",
            MuscleGroup::Adductors => "Adductors",
        }
    }

    /// All muscle groups for iteration
    pub fn all() -> &'static [MuscleGroup] {
        &[
            MuscleGroup::Chest,
            MuscleGroup::FrontDelts,
            MuscleGroup::SideDelts,
            MuscleGroup::RearDelts,
            MuscleGroup::Triceps,
            MuscleGroup::Biceps,
            MuscleGroup::Forearms,
            MuscleGroup::Lats,
            MuscleGroup::Traps,
            MuscleGroup::UpperBack,
            MuscleGroup::LowerBack,
            MuscleGroup::Abs,
            MuscleGroup::Obliques,
            MuscleGroup::Glutes,
            MuscleGroup::Quads,
            MuscleGroup::Hamstrings,
            MuscleGroup::Calves,
            MuscleGroup::Adductors,
        ]
    }
}

#[derive(Debug, Clone)]
pub struct PresetExercise {
    pub name: &'static str,
    pub muscle_groups: &'static [MuscleGroup],
}

pub const PRESET_EXERCISES: &[PresetExercise] = &[
    PresetExercise {
        name: "Bench Press",
        muscle_groups: &[MuscleGroup::Chest, MuscleGroup::FrontDelts, MuscleGroup::Triceps],
    },
    PresetExercise {
        name: "Squat",
        muscle_groups: &[
            MuscleGroup::Quads,
            MuscleGroup::Glutes,
            MuscleGroup::Adductors,
            MuscleGroup::LowerBack,
        ],
    },
    PresetExercise {
        name: "Deadlift",
        muscle_groups: &[
            MuscleGroup::Hamstrings,
            MuscleGroup::Glutes,
            MuscleGroup::LowerBack,
            MuscleGroup::Traps,
            MuscleGroup::Forearms,
        ],
    },
    PresetExercise {
        name: "Overhead Press",
        muscle_groups: &[MuscleGroup::FrontDelts, MuscleGroup::SideDelts, MuscleGroup::Triceps],
    },
    PresetExercise {
        name: "Barbell Row",
        muscle_groups: &[
            MuscleGroup::Lats,
            MuscleGroup::UpperBack,
            MuscleGroup::RearDelts,
            MuscleGroup::Biceps,
        ],
    },
    PresetExercise {
        name: "Pull Up",
        muscle_groups: &[MuscleGroup::Lats, MuscleGroup::Biceps, MuscleGroup::UpperBack],
    },
    PresetExercise {
        name: "Dumbbell Curl",
        muscle_groups: &[MuscleGroup::Biceps, MuscleGroup::Forearms],
    },
    PresetExercise {
        name: "Lateral Raise",
        muscle_groups: &[MuscleGroup::SideDelts, MuscleGroup::Traps],
    },
];

pub fn get_preset_exercises() -> &'static [PresetExercise] {
    PRESET_EXERCISES
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_muscle_names_unique() {
        let names: HashSet<_> = MuscleGroup::all().iter().map(|m| m.name()).collect();
        assert_eq!(names.len(), MuscleGroup::all().len());
    }

    #[test]
    fn test_preset_names_unique() {
        let names: HashSet<_> = get_preset_exercises().iter().map(|e| e.name).collect();
        assert_eq!(names.len(), PRESET_EXERCISES.len());
    }

    #[test]
    fn test_every_preset_targets_muscles() {
        for exercise in get_preset_exercises() {
            assert!(!exercise.muscle_groups.is_empty(), "{} has no muscles", exercise.name);
        }
    }
}
