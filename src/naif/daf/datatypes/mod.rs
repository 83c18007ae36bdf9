/*
 * Helios Toolkit
 * Copyright (C) 2023-onward the Helios contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

pub mod chebyshev;
pub mod modified_diff;

pub use chebyshev::{Type2ChebyshevSet, Type3ChebyshevSet};
pub use modified_diff::ModifiedDiffType1;

/// Upper bound on the doubles of one interpolation record, sized for Chebyshev
/// segments up to degree 32. Keeps the per-query scratch on the stack.
pub(crate) const MAX_RCRD_DOUBLES: usize = 256;
