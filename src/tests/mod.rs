mod macros;

mod canon;
mod molecule;
mod molfile;
mod native;
mod toolkit;
mod valence;
