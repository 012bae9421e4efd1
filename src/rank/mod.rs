/*
 * SPDX-FileCopyrightText: 2026 The csr-kernels developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Ranking algorithms.

pub mod pagerank;
