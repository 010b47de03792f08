#[derive(Debug, PartialEq, Clone, Copy)]
pub enum CarouselPhase {
    Probing, // Candidates not validated yet
    Running, // At least one image validated, accepting input
    Inert,   // Nothing validated: no timer, no indicators
}
