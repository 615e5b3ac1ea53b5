// Interface adapters: frame output, scripted input and asset lookup.

pub mod assets;
pub mod input;
pub mod presenter;
pub mod protocol;
