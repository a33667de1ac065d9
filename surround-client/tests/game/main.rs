mod common;

mod clock;
mod estimation;
mod flow;
mod handicap;
mod removal;
