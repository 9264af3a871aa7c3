pub mod affirmation;
