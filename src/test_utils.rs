// Copyright 2021 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

/// Asserts that an expression matches a pattern, optionally running an
/// expression with the pattern's bindings.
macro_rules! assert_variant {
    ($value:expr, $pattern:pat) => {
        match $value {
            $pattern => {}
            other => panic!("unexpected variant: {:?}", other),
        }
    };
    ($value:expr, $pattern:pat => $then:expr) => {
        match $value {
            $pattern => $then,
            other => panic!("unexpected variant: {:?}", other),
        }
    };
}
