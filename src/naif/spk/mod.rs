/*
 * Helios Toolkit
 * Copyright (C) 2023-onward the Helios contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

pub mod summary;

pub use summary::SPKSummaryRecord;
