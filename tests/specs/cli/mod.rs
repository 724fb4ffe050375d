mod cursor;
mod errors;
mod help;
