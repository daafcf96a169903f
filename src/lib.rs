// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Client for Apple's TSS firmware signing service.

Apple devices only accept firmware that the TSS ("Tatsu Signing Server")
service has personalized for the specific device. This crate implements
the client side of that protocol:

* Building a signing request describing a device and the firmware
  components to sign, from device identity parameters and a build
  manifest identity. (See [TssRequest].)
* Submitting the request over HTTP(S), with failover across the known
  service endpoints and a bounded retry loop interpreting the server's
  protocol status codes. (See [TssServerClient].)
* Extracting signed tickets and per-component blobs from the parsed
  response. (See [TssResponse].)

Requests and responses are XML property lists handled with the `plist`
crate. Device parameters and build identities are supplied by the caller
as already-parsed [plist::Dictionary] documents; this crate never reads
firmware archives, devices, or files itself.

The protocol is undocumented and version sensitive. Which fields are
required varies per request variant, numeric identifiers arrive as
base-16 strings, and the baseband path tolerates missing fields the AP
path treats as fatal. Those asymmetries are load-bearing compatibility
behavior, not accidents.

Diagnostics are emitted through the `log` facade. At debug level the
full request and response plists are dumped.
*/

pub mod dict;
mod error;
pub use error::*;
mod request;
pub use request::*;
mod response;
pub use response::*;
mod transport;
pub use transport::*;
