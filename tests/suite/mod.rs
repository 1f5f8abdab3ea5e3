mod editing;
mod filtering;
mod remote_errors;
