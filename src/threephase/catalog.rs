//! The six catalogued three-phase derivations.

use super::{Component, Condition, Equation, Geometry, Problem, Symmetry};

const PLANAR_UNKNOWNS: [&str; 6] = ["A_alpha", "B_alpha", "A_beta", "B_beta", "A_gamma", "B_gamma"];
const CYLINDRICAL_UNKNOWNS: [&str; 5] = ["A_alpha", "A_beta", "B_beta", "A_gamma", "B_gamma"];

fn eq(condition: Condition, text: &'static str) -> Equation {
    Equation { condition, text }
}

pub fn catalog() -> Vec<Problem> {
    vec![
        planar_eigenstrain(),
        planar_applied_displacement(),
        aniso_planar_eigenstrain(),
        aniso_shear_components(),
        cylindrical_eigenstrain(),
        cylindrical_applied_strain(),
    ]
}

/// Slab fixed at both ends, eigenstrain in the beta layer.
pub fn planar_eigenstrain() -> Problem {
    use Condition::*;
    Problem::new(
        "planar_eigenstrain",
        "Planar slab with fixed ends and beta-phase eigenstrain",
        Geometry::Planar,
        Component::X,
        Symmetry::Isotropic,
        true,
        &PLANAR_UNKNOWNS,
        vec![
            eq(Boundary, "A_alpha*(Lx/2) - B_alpha = 0"),
            eq(DisplacementContinuity, "(A_alpha*x1 + B_alpha) - (A_beta*x1 + B_beta) = 0"),
            eq(
                StressContinuity,
                "mod_alpha*A_alpha - mod_beta*A_beta + 2*(lambda_beta + mu_beta)*eT = 0",
            ),
            eq(DisplacementContinuity, "(A_beta*x2 + B_beta) - (A_gamma*x2 + B_gamma) = 0"),
            eq(
                StressContinuity,
                "mod_beta*A_beta - 2.0*(lambda_beta + mu_beta)*eT - mod_gamma*A_gamma = 0",
            ),
            eq(Boundary, "-A_gamma*(Lx/2) - B_gamma = 0"),
        ],
        &["A_alpha"],
    )
}

/// Same slab driven only by prescribed end displacements.
pub fn planar_applied_displacement() -> Problem {
    use Condition::*;
    Problem::new(
        "planar_applied_displacement",
        "Planar slab with prescribed end displacements",
        Geometry::Planar,
        Component::X,
        Symmetry::Isotropic,
        false,
        &PLANAR_UNKNOWNS,
        vec![
            eq(Boundary, "-A_alpha*(Lx/2) + B_alpha = ux_left"),
            eq(DisplacementContinuity, "(A_alpha*x1 + B_alpha) - (A_beta*x1 + B_beta) = 0"),
            eq(StressContinuity, "mod_alpha*A_alpha - mod_beta*A_beta = 0"),
            eq(DisplacementContinuity, "(A_beta*x2 + B_beta) - (A_gamma*x2 + B_gamma) = 0"),
            eq(StressContinuity, "mod_beta*A_beta - mod_gamma*A_gamma = 0"),
            eq(Boundary, "A_gamma*(Lx/2) + B_gamma = ux_right"),
        ],
        &["A_beta"],
    )
}

pub fn aniso_planar_eigenstrain() -> Problem {
    use Condition::*;
    Problem::new(
        "aniso_planar_eigenstrain",
        "Anisotropic planar slab, x displacement with beta-phase eigenstrain",
        Geometry::Planar,
        Component::X,
        Symmetry::Anisotropic,
        true,
        &["Ax_alpha", "Bx_alpha", "Ax_beta", "Bx_beta", "Ax_gamma", "Bx_gamma"],
        vec![
            eq(Boundary, "Ax_alpha*(Lx/2) - Bx_alpha + uxL = 0"),
            eq(DisplacementContinuity, "(Ax_alpha*x1 + Bx_alpha) - (Ax_beta*x1 + Bx_beta) = 0"),
            eq(
                StressContinuity,
                "mod_alpha*Ax_alpha - mod_beta*Ax_beta + muprime_alpha*Ax_alpha \
                 - muprime_beta*Ax_beta + zeta_beta*eT = 0",
            ),
            eq(DisplacementContinuity, "(Ax_beta*x2 + Bx_beta) - (Ax_gamma*x2 + Bx_gamma) = 0"),
            eq(
                StressContinuity,
                "mod_beta*Ax_beta - mod_gamma*Ax_gamma + muprime_beta*Ax_beta \
                 - muprime_gamma*Ax_gamma - zeta_beta*eT = 0",
            ),
            eq(Boundary, "uxR - Ax_gamma*(Lx/2) - Bx_gamma = 0"),
        ],
        &["Ax_gamma"],
    )
}

pub fn aniso_shear_components() -> Problem {
    use Condition::*;
    Problem::new(
        "aniso_shear_components",
        "Planar slab, y displacement under prescribed shear",
        Geometry::Planar,
        Component::Y,
        Symmetry::Anisotropic,
        false,
        &["Ay_alpha", "By_alpha", "Ay_beta", "By_beta", "Ay_gamma", "By_gamma"],
        vec![
            eq(Boundary, "Ay_alpha*(Lx/2) - By_alpha + uyL = 0"),
            eq(DisplacementContinuity, "(Ay_alpha*x1 + By_alpha) - (Ay_beta*x1 + By_beta) = 0"),
            eq(StressContinuity, "2*mu_alpha*Ay_alpha - 2*mu_beta*Ay_beta = 0"),
            eq(DisplacementContinuity, "(Ay_beta*x2 + By_beta) - (Ay_gamma*x2 + By_gamma) = 0"),
            eq(StressContinuity, "2*mu_beta*Ay_beta - 2*mu_gamma*Ay_gamma = 0"),
            eq(Boundary, "uyR - Ay_gamma*(Lx/2) - By_gamma = 0"),
        ],
        &["Ay_beta"],
    )
}

/// Concentric cylinders, traction-free outer surface, eigenstrain in the beta shell.
pub fn cylindrical_eigenstrain() -> Problem {
    use Condition::*;
    Problem::new(
        "cylindrical_eigenstrain",
        "Concentric cylinders with beta-phase eigenstrain and free outer surface",
        Geometry::Cylindrical,
        Component::Radial,
        Symmetry::Isotropic,
        true,
        &CYLINDRICAL_UNKNOWNS,
        vec![
            eq(DisplacementContinuity, "(A_alpha - A_beta)*x1 - B_beta/x1 = 0"),
            eq(
                StressContinuity,
                "(mod_alpha*A_alpha + lambda_alpha*A_alpha) - mod_beta*(A_beta - B_beta/x1^2) \
                 - lambda_beta*(A_beta + B_beta/x1^2) + 2*(lambda_beta + mu_beta)*eT = 0",
            ),
            eq(DisplacementContinuity, "(A_beta - A_gamma)*x2 + (B_beta - B_gamma)/x2 = 0"),
            eq(
                StressContinuity,
                "mod_beta*(A_beta - B_beta/x2^2) + lambda_beta*(A_beta + B_beta/x2^2) \
                 - 2*(lambda_beta + mu_beta)*eT - mod_gamma*(A_gamma - B_gamma/x2^2) \
                 - lambda_gamma*(A_gamma + B_gamma/x2^2) = 0",
            ),
            eq(
                Boundary,
                "mod_gamma*(A_gamma - B_gamma/radius^2) + lambda_gamma*(A_gamma + B_gamma/radius^2) = 0",
            ),
        ],
        &["A_gamma"],
    )
}

/// Concentric cylinders with a prescribed hoop strain at the outer radius.
pub fn cylindrical_applied_strain() -> Problem {
    use Condition::*;
    Problem::new(
        "cylindrical_applied_strain",
        "Concentric cylinders with applied outer hoop strain",
        Geometry::Cylindrical,
        Component::Radial,
        Symmetry::Isotropic,
        false,
        &CYLINDRICAL_UNKNOWNS,
        vec![
            eq(DisplacementContinuity, "(A_alpha - A_beta)*x1 - B_beta/x1 = 0"),
            eq(
                StressContinuity,
                "(mod_alpha*A_alpha + lambda_alpha*A_alpha) - mod_beta*(A_beta - B_beta/x1^2) \
                 - lambda_beta*(A_beta + B_beta/x1^2) = 0",
            ),
            eq(DisplacementContinuity, "(A_beta - A_gamma)*x2 + (B_beta - B_gamma)/x2 = 0"),
            eq(
                StressContinuity,
                "mod_beta*(A_beta - B_beta/x2^2) + lambda_beta*(A_beta + B_beta/x2^2) \
                 - mod_gamma*(A_gamma - B_gamma/x2^2) - lambda_gamma*(A_gamma + B_gamma/x2^2) = 0",
            ),
            eq(Boundary, "A_gamma + B_gamma/radius^2 = erg"),
        ],
        &["A_gamma"],
    )
}
