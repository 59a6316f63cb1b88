mod cancel;
mod helpers;
mod mocks;
mod points;
